use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// An interned string.
///
/// Ids are only meaningful relative to the [`StringPool`] that issued them.
/// A handful of well-known strings are interned up front so that sentinel
/// comparisons (empty version, source architectures) never need a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// The empty string, used as the "no version" sentinel.
    pub const EMPTY: Id = Id(0);
    /// Architecture of packages that run anywhere.
    pub const ARCH_NOARCH: Id = Id(1);
    /// Architecture of source packages.
    pub const ARCH_SRC: Id = Id(2);
    /// Architecture of source packages with restricted distribution.
    pub const ARCH_NOSRC: Id = Id(3);

    const PREDEFINED: [&'static str; 4] = ["", "noarch", "src", "nosrc"];

    /// Returns the raw index of this id.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Returns `true` for the two source-package architectures.
    #[inline]
    pub fn is_source_arch(self) -> bool {
        self == Self::ARCH_SRC || self == Self::ARCH_NOSRC
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Append-only string interner.
#[derive(Debug, Clone)]
pub struct StringPool {
    strings: Vec<String>,
    lookup: HashMap<String, Id>,
}

impl Default for StringPool {
    fn default() -> Self {
        let mut pool = Self { strings: Vec::new(), lookup: HashMap::new() };
        for s in Id::PREDEFINED {
            pool.intern(s);
        }
        pool
    }
}

impl StringPool {
    /// Intern `s`, returning the existing id if it is already known.
    pub fn intern(&mut self, s: &str) -> Id {
        if let Some(id) = self.lookup.get(s) {
            return *id;
        }
        let id = Id(self.strings.len() as u32);
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), id);
        id
    }

    /// Look up `s` without interning it.
    pub fn find(&self, s: &str) -> Option<Id> {
        self.lookup.get(s).copied()
    }

    /// Resolve an id back to its string.
    pub fn resolve(&self, id: Id) -> Option<&str> {
        self.strings.get(id.0 as usize).map(String::as_str)
    }

    /// Number of interned strings, including the predefined ones.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Id::EMPTY, "")]
    #[case(Id::ARCH_NOARCH, "noarch")]
    #[case(Id::ARCH_SRC, "src")]
    #[case(Id::ARCH_NOSRC, "nosrc")]
    fn test_predefined(#[case] id: Id, #[case] expected: &str) {
        let pool = StringPool::default();
        assert_eq!(pool.resolve(id), Some(expected));
        assert_eq!(pool.find(expected), Some(id));
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut pool = StringPool::default();
        let before = pool.len();
        let first = pool.intern("application:Foo");
        let second = pool.intern("application:Foo");
        assert_eq!(first, second);
        assert_eq!(pool.len(), before + 1);
        assert_eq!(pool.resolve(first), Some("application:Foo"));
    }

    #[test]
    fn test_source_arch() {
        assert!(Id::ARCH_SRC.is_source_arch());
        assert!(Id::ARCH_NOSRC.is_source_arch());
        assert!(!Id::ARCH_NOARCH.is_source_arch());
    }
}
