use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::decode;
use crate::lines::LineSource;
use crate::matcher;
use crate::response;
use crate::types::{MatchEvent, SearchConfig, SearchStats};

/// Search every record in `reader` for the configured terms, with a
/// concurrency limit on per-line processing.
///
/// - Limits in-flight line tasks with a `Semaphore`; the producing side
///   suspends at admission once `concurrency` tasks hold a slot.
/// - Each admitted line runs parse → base64 decode → response
///   reconstruction → term matching in its own task; per-line failures are
///   absorbed there and cost only that line.
/// - `MatchEvent`s are sent to `events` as they are found; completion order
///   across lines is unordered, term order within one line is the supplied
///   order.
/// - Returns once every admitted task has finished.
pub async fn search_reader<R>(
    reader: R,
    config: &SearchConfig,
    events: UnboundedSender<MatchEvent>,
) -> Result<SearchStats>
where
    R: AsyncRead + Unpin,
{
    search_reader_internal(reader, config, events, None).await
}

/// Variant that accepts a `CancellationToken`. Cancellation stops admitting
/// new lines; already-admitted tasks still run to completion before the
/// stats are returned.
pub async fn search_reader_with_cancel<R>(
    reader: R,
    config: &SearchConfig,
    events: UnboundedSender<MatchEvent>,
    cancel: CancellationToken,
) -> Result<SearchStats>
where
    R: AsyncRead + Unpin,
{
    search_reader_internal(reader, config, events, Some(cancel)).await
}

/// Open `path` and search it. Failing to open the input is the one fatal
/// error of a run; everything after admission is absorbed per line.
pub async fn search_file(
    path: impl AsRef<Path>,
    config: &SearchConfig,
    events: UnboundedSender<MatchEvent>,
) -> Result<SearchStats> {
    let file = File::open(path.as_ref())
        .await
        .with_context(|| format!("failed to open input file: {}", path.as_ref().display()))?;
    search_reader(file, config, events).await
}

async fn search_reader_internal<R>(
    reader: R,
    config: &SearchConfig,
    events: UnboundedSender<MatchEvent>,
    cancel_opt: Option<CancellationToken>,
) -> Result<SearchStats>
where
    R: AsyncRead + Unpin,
{
    ensure!(config.concurrency >= 1, "concurrency must be at least 1");

    let terms = Arc::new(config.terms.clone());
    let sem = Arc::new(Semaphore::new(config.concurrency));
    let mut set = JoinSet::new();
    let cancel = cancel_opt.unwrap_or_default();

    let events_emitted = Arc::new(AtomicU64::new(0));
    let in_flight = Arc::new(AtomicU64::new(0));
    let peak_in_flight = Arc::new(AtomicU64::new(0));

    let mut source = LineSource::new(reader);
    let mut lines_read = 0u64;

    loop {
        if cancel.is_cancelled() {
            break;
        }
        let line = match source
            .next_line()
            .await
            .context("failed to read input stream")?
        {
            Some(line) => line,
            None => break,
        };
        lines_read += 1;

        // Admission gate: suspends the producer while the pool is saturated.
        let permit = sem
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore in scope");
        let terms = terms.clone();
        let events = events.clone();
        let events_emitted = events_emitted.clone();
        let in_flight = in_flight.clone();
        let peak_in_flight = peak_in_flight.clone();

        set.spawn(async move {
            let _permit = permit; // slot held until the task completes

            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak_in_flight.fetch_max(now, Ordering::SeqCst);

            let record = decode::parse_record(&line);
            let raw = decode::decode_payload(&record.data);
            if let Some(body) = response::reconstruct(&raw).text() {
                let hits = matcher::scan_body(body, &terms, &record.ip, &events);
                events_emitted.fetch_add(hits, Ordering::Relaxed);
            }

            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    // Drain: the pipeline is not done while any task is still running.
    while let Some(res) = set.join_next().await {
        res.context("line task panicked")?;
    }

    Ok(SearchStats {
        lines_read,
        events_emitted: events_emitted.load(Ordering::Relaxed),
        peak_in_flight: peak_in_flight.load(Ordering::SeqCst),
    })
}
