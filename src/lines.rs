use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Sequential source of logical lines from an async byte stream.
///
/// A logical line may span several underlying buffer fills; fragments are
/// reassembled exactly until a `\n` boundary is seen. A trailing fragment
/// with no final newline is yielded as the last line rather than dropped.
/// End of stream is a normal termination signal (`Ok(None)`), not a failure.
pub struct LineSource<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
        }
    }

    /// Read the next logical line with its terminator stripped.
    ///
    /// Input lines are externally sourced and not guaranteed to be UTF-8;
    /// invalid sequences are replaced lossily rather than erroring.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
