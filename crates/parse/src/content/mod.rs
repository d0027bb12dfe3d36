//! Character data collection for the element currently being captured.

mod normalize;

pub use self::normalize::{indent, wsstrip};
use std::borrow::Cow;

/// Extra headroom added whenever the buffer has to grow.
const SLACK: usize = 256;

/// Growable text buffer that is always NUL-terminated.
///
/// The terminator is maintained by every mutator, so the backing storage
/// always satisfies `capacity >= len + 1` and can be handed to code that
/// expects C-style strings without copying.
#[derive(Debug, Clone)]
pub struct ContentBuffer {
    /// Content followed by exactly one `0` byte.
    bytes: Vec<u8>,
}

impl Default for ContentBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentBuffer {
    pub fn new() -> Self {
        let mut bytes = Vec::with_capacity(SLACK);
        bytes.push(0);
        Self { bytes }
    }

    /// Length of the content, excluding the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Forget the content, keeping the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.bytes.push(0);
    }

    /// Append raw bytes.
    pub fn append(&mut self, data: &[u8]) {
        self.grow_to_fit(data.len());
        self.bytes.pop();
        self.bytes.extend_from_slice(data);
        self.bytes.push(0);
    }

    /// Content without the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// Content including the trailing `0`.
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// Content as text. Everything fed into the buffer comes from decoded
    /// XML so this only allocates if that contract was broken.
    pub fn to_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Overwrite a single content byte in place. Out of range writes are
    /// ignored, so the terminator can never be clobbered.
    pub(crate) fn set_byte(&mut self, index: usize, byte: u8) {
        if index < self.len() {
            self.bytes[index] = byte;
        }
    }

    /// Make room for `additional` more content bytes.
    fn grow_to_fit(&mut self, additional: usize) {
        let needed = self.bytes.len() + additional;
        if needed > self.bytes.capacity() {
            let target = (self.bytes.capacity() * 2).max(needed + SLACK);
            self.bytes.reserve_exact(target - self.bytes.len());
        }
    }
}
