use crate::RecordId;
use std::collections::BTreeMap;

/// A resolved attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum AttrValue {
    Str(String),
    Array(Vec<String>),
}

/// A fully resolved, owned snapshot of a record: every id replaced by its
/// string, every relation rendered (`name` or `name = evr`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecordView {
    pub id: RecordId,
    pub name: Option<String>,
    pub arch: Option<String>,
    pub evr: Option<String>,
    pub requires: Vec<String>,
    pub provides: Vec<String>,
    pub attributes: BTreeMap<&'static str, AttrValue>,
}
