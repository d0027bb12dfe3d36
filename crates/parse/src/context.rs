//! The element state machine.
//!
//! Nesting is tracked with two counters instead of a stack: `depth` is the
//! number of open elements, `state_depth` the depth of the innermost element
//! that matched a transition. While they differ the parser is inside an
//! unknown subtree and ignores everything until it unwinds. Leaving a known
//! element restores the parent state through the transition table.

use crate::content::{ContentBuffer, wsstrip};
use crate::description::DescriptionAssembler;
use crate::desktop::DesktopResolver;
use crate::driver::{Attributes, Handler};
use crate::flags::Flags;
use crate::state::{ElementState, STATE_TABLE};
use crate::synth::{APPLICATION_PREFIX, DependencyInputs, appdata_link, synthesize};
use appdata_pool::{ArrayKey, Key, PackageStore, RecordId, Relation};
use tracing::{debug, trace};

const LANG_ATTRIBUTE: &str = "xml:lang";
const TYPE_ATTRIBUTE: &str = "type";
const DEFAULT_TYPE: &str = "desktop";

/// Per-document parser state.
pub(crate) struct ParseContext<'a, S: PackageStore + ?Sized> {
    store: &'a mut S,
    flags: Flags,
    filename: Option<&'a str>,
    owners: &'a [RecordId],
    desktop: Option<&'a dyn DesktopResolver>,

    depth: u32,
    state_depth: u32,
    state: ElementState,
    /// Depth of the language-tagged element being suppressed, if any.
    skip_depth: Option<u32>,
    capture: bool,
    content: ContentBuffer,
    description: DescriptionAssembler,

    record: Option<RecordId>,
    desktop_file: Option<String>,
    has_summary: bool,
    completed: Vec<RecordId>,
}

/// ParseContext Internals
impl<'a, S: PackageStore + ?Sized> ParseContext<'a, S> {
    /// Whitespace-normalized captured text.
    fn take_text(&mut self) -> String {
        wsstrip(&mut self.content);
        self.content.to_str().into_owned()
    }

    fn enter(&mut self, attributes: &Attributes) {
        match self.state {
            ElementState::Application => {
                let record = self.store.add_record();
                let category = attributes.get(TYPE_ATTRIBUTE).filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TYPE);
                self.store.set_str(record, Key::Category, category);
                self.record = Some(record);
                self.desktop_file = None;
                self.has_summary = false;
                debug!(%record, category, "application opened");
            },
            ElementState::Description => self.description.reset(),
            ElementState::OrderedList | ElementState::UnorderedList => self.description.start_list(),
            _ => {},
        }
    }

    fn finalize(&mut self) {
        let Some(record) = self.record else {
            return;
        };
        match self.state {
            ElementState::Application => self.close_application(record),
            ElementState::Id => self.desktop_file = Some(self.take_text()),
            ElementState::Name => {
                let name = format!("{APPLICATION_PREFIX}{}", self.take_text());
                let name = self.store.intern(&name);
                self.store.set_name(record, name);
            },
            ElementState::Summary => {
                self.has_summary = true;
                let summary = self.take_text();
                self.store.set_str(record, Key::Summary, &summary);
            },
            ElementState::Url => {
                let url = self.take_text();
                self.store.set_str(record, Key::Url, &url);
            },
            ElementState::Licence => self.push_array(record, ArrayKey::License),
            ElementState::Group => self.push_array(record, ArrayKey::Group),
            ElementState::Extends => self.push_array(record, ArrayKey::Extends),
            ElementState::Keyword => self.push_array(record, ArrayKey::Keywords),
            ElementState::PkgName => {
                let pkgname = self.take_text();
                let requirement = self.store.intern(&pkgname);
                let link = self.store.intern(&appdata_link(&pkgname));
                self.store.add_requires(record, Relation::named(requirement));
                self.store.add_provides(record, Relation::named(link));
            },
            ElementState::Description => {
                if let Some(description) = self.description.finish() {
                    self.store.set_str(record, Key::Description, &description);
                }
            },
            ElementState::Paragraph => self.description.paragraph(&mut self.content),
            ElementState::UnorderedListItem => self.description.unordered_item(&mut self.content),
            ElementState::OrderedListItem => self.description.ordered_item(&mut self.content),
            ElementState::UnorderedList | ElementState::OrderedList => self.description.end_list(),
            ElementState::Start | ElementState::Keywords => {},
        }
    }

    fn push_array(&mut self, record: RecordId, key: ArrayKey) {
        let value = self.take_text();
        self.store.add_array_str(record, key, &value);
    }

    fn close_application(&mut self, record: RecordId) {
        let inputs = DependencyInputs {
            desktop_file: self.desktop_file.as_deref(),
            filename: self.filename,
            owners: self.owners,
            has_summary: self.has_summary,
        };
        synthesize(&mut *self.store, record, &inputs, self.flags, self.desktop);
        debug!(%record, "application closed");
        self.completed.push(record);
        self.record = None;
        self.desktop_file = None;
    }
}

/// ParseContext Public
impl<'a, S: PackageStore + ?Sized> ParseContext<'a, S> {
    pub fn new(store: &'a mut S, flags: Flags) -> Self {
        Self {
            store,
            flags,
            filename: None,
            owners: &[],
            desktop: None,
            depth: 0,
            state_depth: 0,
            state: ElementState::Start,
            skip_depth: None,
            capture: false,
            content: ContentBuffer::new(),
            description: DescriptionAssembler::new(),
            record: None,
            desktop_file: None,
            has_summary: false,
            completed: Vec::new(),
        }
    }

    pub fn with_filename(mut self, filename: Option<&'a str>) -> Self {
        self.filename = filename;
        self
    }

    pub fn with_owners(mut self, owners: &'a [RecordId]) -> Self {
        self.owners = owners;
        self
    }

    pub fn with_desktop_resolver(mut self, desktop: Option<&'a dyn DesktopResolver>) -> Self {
        self.desktop = desktop;
        self
    }

    /// Drop the record of a top element that never closed.
    pub fn abort(&mut self) {
        if let Some(record) = self.record.take() {
            debug!(%record, "discarding partially parsed record");
            self.store.discard_record(record);
        }
    }

    /// Records completed so far, in document order.
    pub fn into_records(self) -> Vec<RecordId> {
        self.completed
    }
}

impl<S: PackageStore + ?Sized> Handler for ParseContext<'_, S> {
    fn start_element(&mut self, name: &str, attributes: &Attributes) {
        if self.depth != self.state_depth {
            self.depth += 1;
            return;
        }
        self.depth += 1;
        let Some(transition) = STATE_TABLE.lookup(self.state, name) else {
            trace!(name, state = %self.state, depth = self.depth, "entering unknown subtree");
            return;
        };
        self.state = transition.to;
        self.capture = transition.captures_text;
        self.state_depth = self.depth;
        self.content.clear();

        if self.skip_depth.is_none() && attributes.get(LANG_ATTRIBUTE).is_some() {
            trace!(name, depth = self.depth, "skipping localized element");
            self.skip_depth = Some(self.depth);
        }
        if self.skip_depth.is_some() {
            self.capture = false;
            return;
        }
        self.enter(attributes);
    }

    fn end_element(&mut self, _name: &str) {
        if self.depth != self.state_depth {
            self.depth -= 1;
            return;
        }
        let closing = self.depth;
        self.depth -= 1;
        self.state_depth -= 1;

        match self.skip_depth {
            Some(skip) if closing >= skip => {
                if closing == skip {
                    self.skip_depth = None;
                }
            },
            _ => {
                self.skip_depth = None;
                self.finalize();
            },
        }
        self.state = STATE_TABLE.parent(self.state);
        self.capture = false;
    }

    fn characters(&mut self, text: &str) {
        if self.capture {
            self.content.append(text.as_bytes());
        }
    }
}
