use serde::Deserialize;

/// One parsed capture line: a base64-encoded raw HTTP response plus
/// metadata about the scanned target.
///
/// Every field defaults to empty/zero so a malformed line can map to a
/// harmless record instead of aborting the batch.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Record {
    pub data: String,
    pub host: String,
    pub ip: String,
    pub path: String,
    pub port: u16,
}

/// A search-term hit: the response captured from `ip` contains `term`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchEvent {
    pub ip: String,
    pub term: String,
}

/// Caller-supplied pipeline configuration.
///
/// `terms` are tried in order against each body; `concurrency` caps the
/// number of per-line tasks in flight at once (must be at least 1).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub terms: Vec<String>,
    pub concurrency: usize,
}

/// Aggregate counters for one completed run.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub lines_read: u64,
    pub events_emitted: u64,
    pub peak_in_flight: u64,
}
