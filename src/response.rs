use std::io::Read;

use flate2::read::GzDecoder;

/// Outcome of reconstructing a captured HTTP response body.
///
/// `Empty` names the fail-closed state: bytes that do not frame as an HTTP
/// response, or a body whose compressed stream is corrupt. A well-formed
/// response with a zero-length body is `Text("")` — behaviourally the same
/// (no term can match) but distinguishable when testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Empty,
}

impl Body {
    /// Searchable text, or `None` for the fail-closed state.
    pub fn text(&self) -> Option<&str> {
        match self {
            Body::Text(t) => Some(t),
            Body::Empty => None,
        }
    }
}

/// Reconstruct the searchable body from raw captured response bytes.
///
/// Expects an HTTP/1.x framed response: status line, header block, blank
/// line, body. Header names are matched case-insensitively. When
/// `Content-Encoding` names gzip the body is decompressed; otherwise it
/// stands as-is. Any parse or decompression failure yields `Body::Empty`
/// rather than an error, so a bad capture never aborts the batch.
pub fn reconstruct(raw: &[u8]) -> Body {
    let (head, body) = match split_head(raw) {
        Some(parts) => parts,
        None => return Body::Empty,
    };

    let mut lines = head.split(|&b| b == b'\n').map(strip_cr);
    match lines.next() {
        Some(status) if status.starts_with(b"HTTP/") => {}
        _ => return Body::Empty,
    }

    let mut encoding: Option<String> = None;
    for line in lines {
        if let Some(idx) = line.iter().position(|&b| b == b':') {
            if line[..idx].eq_ignore_ascii_case(b"content-encoding") {
                let value = String::from_utf8_lossy(&line[idx + 1..]);
                encoding = Some(value.trim().to_ascii_lowercase());
            }
        }
    }

    match encoding.as_deref() {
        Some("gzip") => gunzip(body),
        _ => Body::Text(String::from_utf8_lossy(body).into_owned()),
    }
}

/// Split raw bytes at the header/body boundary (CRLFCRLF, or bare LFLF for
/// captures from lax servers). No boundary means a truncated capture.
fn split_head(raw: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(idx) = find(raw, b"\r\n\r\n") {
        return Some((&raw[..idx], &raw[idx + 4..]));
    }
    if let Some(idx) = find(raw, b"\n\n") {
        return Some((&raw[..idx], &raw[idx + 2..]));
    }
    None
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn gunzip(body: &[u8]) -> Body {
    let mut decoder = GzDecoder::new(body);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => Body::Text(String::from_utf8_lossy(&out).into_owned()),
        Err(_) => Body::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn plain_body_passes_through() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html>admin</html>";
        assert_eq!(
            reconstruct(raw),
            Body::Text("<html>admin</html>".to_string())
        );
    }

    #[test]
    fn gzip_body_is_decompressed() {
        let mut raw = b"HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\n\r\n".to_vec();
        raw.extend_from_slice(&gzip(b"secret login page"));
        assert_eq!(reconstruct(&raw), Body::Text("secret login page".to_string()));
    }

    #[test]
    fn header_name_and_value_are_case_insensitive() {
        let mut raw = b"HTTP/1.1 200 OK\r\nCONTENT-ENCODING:  GZIP \r\n\r\n".to_vec();
        raw.extend_from_slice(&gzip(b"body"));
        assert_eq!(reconstruct(&raw), Body::Text("body".to_string()));
    }

    #[test]
    fn corrupt_gzip_fails_closed() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\n\r\nnot a gzip stream";
        assert_eq!(reconstruct(raw), Body::Empty);
    }

    #[test]
    fn truncated_gzip_fails_closed() {
        let mut raw = b"HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\n\r\n".to_vec();
        let gz = gzip(b"a body long enough to truncate meaningfully");
        raw.extend_from_slice(&gz[..gz.len() / 2]);
        assert_eq!(reconstruct(&raw), Body::Empty);
    }

    #[test]
    fn garbage_and_empty_input_fail_closed() {
        assert_eq!(reconstruct(b""), Body::Empty);
        assert_eq!(reconstruct(b"\x00\x01\x02 random bytes"), Body::Empty);
        // Header/body boundary present but no HTTP status line.
        assert_eq!(reconstruct(b"garbage\r\n\r\nbody"), Body::Empty);
        // Headers only, boundary never reached.
        assert_eq!(reconstruct(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n"), Body::Empty);
    }

    #[test]
    fn legitimately_empty_body_is_text_not_empty() {
        let raw = b"HTTP/1.1 204 No Content\r\n\r\n";
        assert_eq!(reconstruct(raw), Body::Text(String::new()));
    }

    #[test]
    fn bare_lf_separators_are_accepted() {
        let raw = b"HTTP/1.0 200 OK\nContent-Type: text/plain\n\nlax server body";
        assert_eq!(reconstruct(raw), Body::Text("lax server body".to_string()));
    }
}
