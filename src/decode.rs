use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use crate::types::Record;

/// Parse one dataset line as a JSON capture record.
///
/// Dataset lines are externally sourced captures and routinely truncated or
/// malformed. A line that is not valid JSON maps to a default record (all
/// fields empty) so the rest of the batch keeps going; downstream stages
/// then naturally produce zero matches for it.
pub fn parse_record(line: &str) -> Record {
    serde_json::from_str(line).unwrap_or_default()
}

/// Decode the record's base64 payload into raw response bytes.
///
/// Invalid base64 decodes to an empty byte sequence. A bad payload costs at
/// most one skipped line, never the whole run.
pub fn decode_payload(data: &str) -> Vec<u8> {
    BASE64_STANDARD.decode(data).unwrap_or_default()
}
