use tokio::sync::mpsc::UnboundedSender;

use crate::types::MatchEvent;

/// Scan one reconstructed body for the configured search terms.
///
/// Terms are tested in the order supplied, with exact case-sensitive
/// substring containment. Each hit is sent to the event sink immediately
/// rather than buffered; a body may hit several terms and each is reported
/// independently. Returns the number of events emitted.
pub fn scan_body(
    body: &str,
    terms: &[String],
    ip: &str,
    events: &UnboundedSender<MatchEvent>,
) -> u64 {
    let mut hits = 0u64;
    for term in terms {
        if body.contains(term.as_str()) {
            // A closed receiver means the consumer stopped listening; the
            // scan itself still completes.
            let _ = events.send(MatchEvent {
                ip: ip.to_string(),
                term: term.clone(),
            });
            hits += 1;
        }
    }
    hits
}
