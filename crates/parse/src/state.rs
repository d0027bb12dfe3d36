//! Element transition table.
//!
//! The document vocabulary is a fixed tree: every recognized element is only
//! valid below exactly one parent state. The table is built once and shared
//! read-only by every parse.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

/// Which part of the document the parser is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    Start,
    Application,
    Id,
    PkgName,
    Licence,
    Name,
    Summary,
    Description,
    Paragraph,
    UnorderedList,
    UnorderedListItem,
    OrderedList,
    OrderedListItem,
    Url,
    Group,
    Keywords,
    Keyword,
    Extends,
}
impl ElementState {
    const COUNT: usize = 18;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Application => "application",
            Self::Id => "id",
            Self::PkgName => "pkgname",
            Self::Licence => "licence",
            Self::Name => "name",
            Self::Summary => "summary",
            Self::Description => "description",
            Self::Paragraph => "paragraph",
            Self::UnorderedList => "unordered-list",
            Self::UnorderedListItem => "unordered-list-item",
            Self::OrderedList => "ordered-list",
            Self::OrderedListItem => "ordered-list-item",
            Self::Url => "url",
            Self::Group => "group",
            Self::Keywords => "keywords",
            Self::Keyword => "keyword",
            Self::Extends => "extends",
        }
    }
}
impl Display for ElementState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// One edge of the state machine: seeing `tag` while in `from` moves to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ElementState,
    pub tag: &'static str,
    pub to: ElementState,
    /// Whether character data inside the element is collected.
    pub captures_text: bool,
}

macro_rules! transition {
    ($from:ident, $tag:literal, $to:ident, $captures:literal) => {
        Transition {
            from: ElementState::$from,
            tag: $tag,
            to: ElementState::$to,
            captures_text: $captures,
        }
    };
}

const TRANSITIONS: [Transition; 20] = [
    transition!(Start, "applications", Start, false),
    transition!(Start, "components", Start, false),
    transition!(Start, "application", Application, false),
    transition!(Start, "component", Application, false),
    transition!(Application, "id", Id, true),
    transition!(Application, "pkgname", PkgName, true),
    transition!(Application, "product_license", Licence, true),
    transition!(Application, "name", Name, true),
    transition!(Application, "summary", Summary, true),
    transition!(Application, "description", Description, false),
    transition!(Application, "url", Url, true),
    transition!(Application, "project_group", Group, true),
    transition!(Application, "keywords", Keywords, false),
    transition!(Application, "extends", Extends, true),
    transition!(Description, "p", Paragraph, true),
    transition!(Description, "ul", UnorderedList, false),
    transition!(Description, "ol", OrderedList, false),
    transition!(UnorderedList, "li", UnorderedListItem, true),
    transition!(OrderedList, "li", OrderedListItem, true),
    transition!(Keywords, "keyword", Keyword, true),
];

/// The shared transition table.
pub static STATE_TABLE: LazyLock<StateTable> = LazyLock::new(|| StateTable::new(&TRANSITIONS));

/// Transitions grouped by source state, plus the parent of every state.
#[derive(Debug)]
pub struct StateTable {
    transitions: Vec<Transition>,
    /// Index of the first transition leaving each state, if it has any.
    first: [Option<usize>; ElementState::COUNT],
    parent: [ElementState; ElementState::COUNT],
}

impl StateTable {
    /// Build a table from an arbitrary list of transitions.
    ///
    /// The list is (stably) sorted by source state so every state's outgoing
    /// edges form one contiguous run.
    pub fn new(transitions: &[Transition]) -> Self {
        let mut transitions = transitions.to_vec();
        transitions.sort_by_key(|t| t.from.index());
        let mut first = [None; ElementState::COUNT];
        let mut parent = [ElementState::Start; ElementState::COUNT];
        for (index, transition) in transitions.iter().enumerate() {
            first[transition.from.index()].get_or_insert(index);
            parent[transition.to.index()] = transition.from;
        }
        Self { transitions, first, parent }
    }

    /// Find the transition for `tag` while in `state`.
    pub fn lookup(&self, state: ElementState, tag: &str) -> Option<&Transition> {
        let start = self.first[state.index()]?;
        self.transitions[start..].iter().take_while(|t| t.from == state).find(|t| t.tag == tag)
    }

    /// The state that encloses `state`.
    #[inline]
    pub fn parent(&self, state: ElementState) -> ElementState {
        self.parent[state.index()]
    }
}
