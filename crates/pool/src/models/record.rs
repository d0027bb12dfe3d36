use crate::{Id, Relation};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Handle of a record inside a [`Pool`](crate::Pool).
///
/// The pool owns the record; holders of a handle may only mutate it through
/// the [`PackageStore`](crate::PackageStore) interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordId(u32);

impl RecordId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
impl From<u32> for RecordId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Record {
    pub name: Option<Id>,
    pub arch: Option<Id>,
    pub evr: Option<Id>,
    pub requires: Vec<Relation>,
    pub provides: Vec<Relation>,
}

impl Record {
    /// Adds a relation unless an identical one is already present.
    pub fn add_requires(&mut self, relation: Relation) {
        if !self.requires.contains(&relation) {
            self.requires.push(relation);
        }
    }

    pub fn add_provides(&mut self, relation: Relation) {
        if !self.provides.contains(&relation) {
            self.provides.push(relation);
        }
    }
}
