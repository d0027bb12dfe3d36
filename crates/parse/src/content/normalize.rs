//! In-place whitespace normalization and list reflow.

use super::ContentBuffer;
use memchr::memchr_iter;

#[inline]
fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n')
}

/// Collapse whitespace runs and trim both ends.
///
/// A run of spaces/tabs becomes one space; a run that contains a newline
/// becomes one newline. Leading and trailing runs are dropped.
pub fn wsstrip(buffer: &mut ContentBuffer) {
    let len = buffer.len();
    let bytes = &mut buffer.bytes;
    let mut write = 0;
    let mut run_has_space = false;
    let mut run_has_newline = false;
    for read in 0..len {
        let byte = bytes[read];
        if is_blank(byte) {
            run_has_newline |= byte == b'\n';
            run_has_space |= byte != b'\n';
            continue;
        }
        if (run_has_space || run_has_newline) && write > 0 {
            bytes[write] = if run_has_newline { b'\n' } else { b' ' };
            write += 1;
        }
        run_has_space = false;
        run_has_newline = false;
        bytes[write] = byte;
        write += 1;
    }
    bytes.truncate(write);
    bytes.push(0);
}

/// Prefix every non-empty line with `width` spaces.
///
/// Lines are separated by `\n`; empty lines are left alone. The buffer grows
/// as needed and the content is shifted in place, back to front.
pub fn indent(buffer: &mut ContentBuffer, width: usize) {
    let len = buffer.len();
    if len == 0 || width == 0 {
        return;
    }
    let starts_line = |bytes: &[u8], at: usize| bytes[at] != b'\n' && (at == 0 || bytes[at - 1] == b'\n');
    let lines = usize::from(buffer.bytes[0] != b'\n')
        + memchr_iter(b'\n', &buffer.bytes[..len]).filter(|nl| nl + 1 < len && buffer.bytes[nl + 1] != b'\n').count();
    if lines == 0 {
        return;
    }
    let new_len = len + width * lines;
    buffer.grow_to_fit(new_len - len);
    let bytes = &mut buffer.bytes;
    bytes.resize(new_len + 1, 0);
    // Every original byte lands at or after its old position, and the bytes
    // still to be read all sit before the write cursor.
    let mut write = new_len;
    for read in (0..len).rev() {
        write -= 1;
        bytes[write] = bytes[read];
        if starts_line(&bytes[..], read) {
            write -= width;
            bytes[write..write + width].fill(b' ');
        }
    }
    debug_assert_eq!(write, 0);
    bytes[new_len] = 0;
}
