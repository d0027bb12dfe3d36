//! Tokenizer seam.
//!
//! The state machine only needs element-start, element-end and text
//! callbacks delivered synchronously in document order. [`Tokenizer`] is
//! that capability; [`XmlTokenizer`] provides it on top of `quick-xml`.

mod position;
mod xml;

pub use self::xml::XmlTokenizer;
use crate::error::Result;

/// Receives document events from a [`Tokenizer`].
pub trait Handler {
    fn start_element(&mut self, name: &str, attributes: &Attributes);
    fn end_element(&mut self, name: &str);
    fn characters(&mut self, text: &str);
}

/// Drives a [`Handler`] over a complete document in a single pass.
///
/// Implementations stop at the first error; events already delivered are
/// not retracted.
pub trait Tokenizer {
    fn tokenize<H: Handler>(self, handler: &mut H) -> Result<()>;
}

/// Decoded attributes of one element, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the first attribute named `name` (qualified, e.g. `xml:lang`).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }
}
