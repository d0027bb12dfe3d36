use crate::driver::position::LineTracker;
use crate::driver::{Attributes, Handler, Tokenizer};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::io::{BufReader, Read};
use tracing::trace;

const BUFF_SIZE: usize = 8192;

/// Streaming XML tokenizer backed by `quick-xml`.
///
/// Empty elements are reported as a start immediately followed by an end,
/// adjacent text runs (including resolved entity and character references
/// and CDATA sections) are delivered as one `characters` call, and line
/// endings are normalized to `\n`.
pub struct XmlTokenizer<R: Read> {
    reader: Reader<LineTracker<BufReader<R>>>,
    pending: String,
    depth: u32,
    seen_root: bool,
}

/// XmlTokenizer Internals
impl<R: Read> XmlTokenizer<R> {
    fn malformed(&self, message: impl Into<String>, offset: u64) -> ErrorKind {
        let (line, column) = self.reader.get_ref().location(offset);
        ErrorKind::Malformed { message: message.into(), line, column }
    }

    fn malformed_here(&self, message: impl Into<String>) -> ErrorKind {
        self.malformed(message, self.reader.buffer_position() as u64)
    }

    fn push_text(&mut self, raw: &[u8]) -> Result<()> {
        let text = match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(_) => exn::bail!(self.malformed_here("not well-formed (invalid token)")),
        };
        if self.depth == 0 {
            if text.bytes().any(|b| !b.is_ascii_whitespace()) {
                let message = match self.seen_root {
                    true => "junk after document element",
                    false => "syntax error",
                };
                exn::bail!(self.malformed_here(message));
            }
            return Ok(());
        }
        if text.contains('\r') {
            self.pending.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
        } else {
            self.pending.push_str(text);
        }
        Ok(())
    }

    /// Character references and the predefined entities only. Entities
    /// declared in an internal DTD subset are not expanded.
    fn push_reference(&mut self, reference: &BytesRef<'_>) -> Result<()> {
        let offset = self.reader.buffer_position() as u64;
        let resolved = reference.resolve_char_ref().or_raise(|| self.malformed("reference to invalid character number", offset))?;
        if let Some(ch) = resolved {
            if self.depth > 0 {
                self.pending.push(ch);
            }
            return Ok(());
        }
        let name = std::str::from_utf8(reference).or_raise(|| self.malformed("not well-formed (invalid token)", offset))?;
        match quick_xml::escape::resolve_predefined_entity(name) {
            Some(value) if self.depth > 0 => self.pending.push_str(value),
            Some(_) => {},
            None => exn::bail!(self.malformed("undefined entity", offset)),
        }
        Ok(())
    }

    fn flush<H: Handler>(&mut self, handler: &mut H) {
        if !self.pending.is_empty() {
            handler.characters(&self.pending);
            self.pending.clear();
        }
    }

    fn attributes(&self, start: &BytesStart<'_>, into: &mut Attributes) -> Result<()> {
        into.clear();
        for attribute in start.attributes() {
            let offset = self.reader.buffer_position() as u64;
            let attribute = attribute.or_raise(|| self.malformed("not well-formed (invalid token)", offset))?;
            let key = std::str::from_utf8(attribute.key.as_ref()).or_raise(|| self.malformed("not well-formed (invalid token)", offset))?;
            let value = attribute.unescape_value().or_raise(|| self.malformed("undefined entity", offset))?;
            into.push(key, value.into_owned());
        }
        Ok(())
    }

    fn element_name<'n>(&self, raw: &'n [u8]) -> Result<&'n str> {
        let offset = self.reader.buffer_position() as u64;
        std::str::from_utf8(raw).or_raise(|| self.malformed("not well-formed (invalid token)", offset))
    }
}

/// XmlTokenizer Public
impl<R: Read> XmlTokenizer<R> {
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(LineTracker::new(BufReader::with_capacity(BUFF_SIZE, input)));
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = true;
        Self { reader, pending: String::new(), depth: 0, seen_root: false }
    }
}

impl<R: Read> Tokenizer for XmlTokenizer<R> {
    fn tokenize<H: Handler>(mut self, handler: &mut H) -> Result<()> {
        let mut buf = Vec::with_capacity(BUFF_SIZE);
        let mut attributes = Attributes::new();
        loop {
            let event = match self.reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(quick_xml::Error::Io(err)) => {
                    return Err(quick_xml::Error::Io(err)).or_raise(|| ErrorKind::Io);
                },
                Err(err) => {
                    let kind = self.malformed(err.to_string(), self.reader.error_position() as u64);
                    return Err(err).or_raise(|| kind);
                },
            };
            match event {
                Event::Start(start) => {
                    if self.depth == 0 && self.seen_root {
                        exn::bail!(self.malformed_here("junk after document element"));
                    }
                    self.flush(handler);
                    self.attributes(&start, &mut attributes)?;
                    let name = self.element_name(start.name().into_inner())?;
                    trace!(name, depth = self.depth, "start element");
                    handler.start_element(name, &attributes);
                    self.depth += 1;
                    self.seen_root = true;
                },
                Event::End(end) => {
                    self.flush(handler);
                    let name = self.element_name(end.name().into_inner())?;
                    handler.end_element(name);
                    self.depth = self.depth.saturating_sub(1);
                },
                Event::Text(text) => self.push_text(&text)?,
                Event::CData(data) => self.push_text(&data)?,
                Event::GeneralRef(reference) => self.push_reference(&reference)?,
                Event::Eof => {
                    if self.depth > 0 {
                        exn::bail!(self.malformed_here("unclosed token"));
                    }
                    if !self.seen_root {
                        exn::bail!(self.malformed_here("no element found"));
                    }
                    return Ok(());
                },
                Event::Empty(_) | Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {},
            }
            buf.clear();
        }
    }
}
