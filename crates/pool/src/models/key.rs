use std::fmt::{Display, Formatter, Result as FmtResult};

/// Single-valued record attributes. Setting one again replaces the old value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Component type (`desktop`, `font`, `addon`...)
    Category,
    /// One-line summary
    Summary,
    /// Reflowed long description
    Description,
    /// Homepage
    Url,
}
impl Key {
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::Category => "category",
            Key::Summary => "summary",
            Key::Description => "description",
            Key::Url => "url",
        }
    }
}
impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Multi-valued record attributes. Values are appended in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArrayKey {
    License,
    Group,
    Extends,
    Keywords,
    /// Files installed by the package, as absolute paths.
    FileList,
}
impl ArrayKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrayKey::License => "license",
            ArrayKey::Group => "group",
            ArrayKey::Extends => "extends",
            ArrayKey::Keywords => "keywords",
            ArrayKey::FileList => "filelist",
        }
    }
}
impl Display for ArrayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
