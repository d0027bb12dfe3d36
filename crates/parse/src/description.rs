//! Long description assembly.
//!
//! Descriptions arrive as a sequence of `<p>`, `<ul>` and `<ol>` blocks. Each
//! block is normalized on close and appended to a single plain-text rendering:
//!
//! ```text
//! First paragraph.
//!
//!   - bullet
//!   - bullet
//!
//!  1. step
//!  2. step
//! ```

use crate::content::{ContentBuffer, indent, wsstrip};

/// Width reserved in front of every list item line for its marker.
const LIST_INDENT: usize = 4;

#[derive(Debug, Default)]
pub struct DescriptionAssembler {
    text: Option<String>,
    items: u32,
}

impl DescriptionAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop anything accumulated so far.
    pub fn reset(&mut self) {
        self.text = None;
    }

    /// Restart item numbering for a new list.
    pub fn start_list(&mut self) {
        self.items = 0;
    }

    /// Paragraphs are followed by a blank line.
    pub fn paragraph(&mut self, content: &mut ContentBuffer) {
        wsstrip(content);
        self.append(content, "\n\n");
    }

    /// `  - item`
    pub fn unordered_item(&mut self, content: &mut ContentBuffer) {
        wsstrip(content);
        indent(content, LIST_INDENT);
        content.set_byte(2, b'-');
        self.append(content, "\n");
    }

    /// ` 1. item` up to ` 9.`, then `10.`, `11.`... The number field is two
    /// digits wide, so past 99 only the last two digits are shown.
    pub fn ordered_item(&mut self, content: &mut ContentBuffer) {
        wsstrip(content);
        indent(content, LIST_INDENT);
        self.items += 1;
        if self.items >= 10 {
            content.set_byte(0, b'0' + ((self.items / 10) % 10) as u8);
        }
        content.set_byte(1, b'0' + (self.items % 10) as u8);
        content.set_byte(2, b'.');
        self.append(content, "\n");
    }

    /// Lists are closed with an extra newline, leaving a blank line after them.
    pub fn end_list(&mut self) {
        self.text.get_or_insert_default().push('\n');
    }

    /// Take the accumulated text with trailing newlines removed. Returns
    /// `None` if nothing but newlines was collected.
    pub fn finish(&mut self) -> Option<String> {
        let mut text = self.text.take()?;
        text.truncate(text.trim_end_matches('\n').len());
        (!text.is_empty()).then_some(text)
    }

    fn append(&mut self, content: &ContentBuffer, separator: &str) {
        let text = self.text.get_or_insert_default();
        text.push_str(&content.to_str());
        text.push_str(separator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn content(text: &str) -> ContentBuffer {
        let mut buffer = ContentBuffer::new();
        buffer.append(text.as_bytes());
        buffer
    }

    #[test]
    fn test_paragraph_then_list() {
        let mut description = DescriptionAssembler::new();
        description.paragraph(&mut content("  Line one.  "));
        description.start_list();
        description.unordered_item(&mut content("Item A"));
        description.unordered_item(&mut content("\n  Item B\n"));
        description.end_list();
        assert_eq!(description.finish().as_deref(), Some("Line one.\n\n  - Item A\n  - Item B"));
    }

    #[test]
    fn test_ordered_markers_cross_ten() {
        let mut description = DescriptionAssembler::new();
        description.start_list();
        for i in 1..=11 {
            description.ordered_item(&mut content(&format!("step {i}")));
        }
        description.end_list();
        let text = description.finish().unwrap();
        let markers: Vec<&str> = text.lines().map(|line| &line[..3]).collect();
        assert_eq!(markers, vec![" 1.", " 2.", " 3.", " 4.", " 5.", " 6.", " 7.", " 8.", " 9.", "10.", "11."]);
        assert!(text.ends_with("11. step 11"));
    }

    #[rstest]
    #[case(99, "99.")]
    #[case(100, "00.")]
    #[case(123, "23.")]
    fn test_ordered_marker_wraps(#[case] count: u32, #[case] expected: &str) {
        let mut description = DescriptionAssembler::new();
        description.start_list();
        for _ in 0..count {
            description.ordered_item(&mut content("x"));
        }
        let text = description.finish().unwrap();
        assert_eq!(&text.lines().last().unwrap()[..3], expected);
    }

    #[test]
    fn test_start_list_restarts_numbering() {
        let mut description = DescriptionAssembler::new();
        description.start_list();
        description.ordered_item(&mut content("a"));
        description.ordered_item(&mut content("b"));
        description.end_list();
        description.start_list();
        description.ordered_item(&mut content("c"));
        description.end_list();
        assert_eq!(description.finish().as_deref(), Some(" 1. a\n 2. b\n\n 1. c"));
    }

    #[test]
    fn test_multiline_item_is_aligned() {
        let mut description = DescriptionAssembler::new();
        description.unordered_item(&mut content("first\nsecond"));
        assert_eq!(description.finish().as_deref(), Some("  - first\n    second"));
    }

    #[test]
    fn test_empty_is_none() {
        let mut description = DescriptionAssembler::new();
        assert_eq!(description.finish(), None);
        description.paragraph(&mut content("   "));
        assert_eq!(description.finish(), None);
    }

    #[test]
    fn test_reset_discards_previous() {
        let mut description = DescriptionAssembler::new();
        description.paragraph(&mut content("old"));
        description.reset();
        description.paragraph(&mut content("new"));
        assert_eq!(description.finish().as_deref(), Some("new"));
    }
}
