mod id;
mod key;
mod record;
mod relation;
mod view;

pub use self::id::{Id, StringPool};
pub use self::key::{ArrayKey, Key};
pub(crate) use self::record::Record;
pub use self::record::RecordId;
pub use self::relation::{RelOp, Relation};
pub use self::view::{AttrValue, RecordView};
