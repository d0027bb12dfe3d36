use crate::Id;

/// Comparison operator of a version-qualified relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Eq,
}
impl RelOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelOp::Eq => "=",
        }
    }
}

/// A requires/provides edge: a capability name, optionally pinned to a
/// version with an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation {
    pub name: Id,
    pub constraint: Option<(RelOp, Id)>,
}
impl Relation {
    /// An unversioned relation on `name`.
    pub fn named(name: Id) -> Self {
        Self { name, constraint: None }
    }

    /// `name = evr`
    pub fn equals(name: Id, evr: Id) -> Self {
        Self { name, constraint: Some((RelOp::Eq, evr)) }
    }
}
