use memchr::memchr_iter;
use std::io::{BufRead, Read, Result as IoResult};

/// Pass-through reader that remembers where every line starts, so byte
/// offsets reported by the tokenizer can be turned into line/column pairs.
#[derive(Debug)]
pub(crate) struct LineTracker<R> {
    inner: R,
    consumed: u64,
    newlines: Vec<u64>,
}

impl<R> LineTracker<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0, newlines: Vec::new() }
    }

    /// 1-based line and 0-based column of a byte offset already read.
    pub fn location(&self, offset: u64) -> (u64, u64) {
        let line = self.newlines.partition_point(|newline| *newline < offset);
        let line_start = match line {
            0 => 0,
            n => self.newlines[n - 1] + 1,
        };
        (line as u64 + 1, offset.saturating_sub(line_start))
    }

    fn record(&mut self, bytes: &[u8]) {
        let base = self.consumed;
        self.newlines.extend(memchr_iter(b'\n', bytes).map(|at| base + at as u64));
        self.consumed += bytes.len() as u64;
    }
}

impl<R: Read> Read for LineTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        let read = self.inner.read(buf)?;
        self.record(&buf[..read]);
        Ok(read)
    }
}

impl<R: BufRead> BufRead for LineTracker<R> {
    fn fill_buf(&mut self) -> IoResult<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amount: usize) {
        // Consuming never follows a failed fill, so the buffered bytes are
        // still there to be inspected.
        let available = self.inner.fill_buf().unwrap_or_default();
        let base = self.consumed;
        let seen = &available[..amount.min(available.len())];
        self.newlines.extend(memchr_iter(b'\n', seen).map(|at| base + at as u64));
        self.consumed += amount as u64;
        self.inner.consume(amount);
    }
}
