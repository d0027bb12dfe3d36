//! In-memory package record store.
//!
//! This crate provides the store that metadata ingestion writes into. It is
//! deliberately small: records are allocated on demand, strings are interned
//! once and referenced by [`Id`], and attribute writes are staged until the
//! caller asks for them to be [internalized](PackageStore::internalize).
//!
//! # Architecture
//! - **Records**: one per ingested package/application entry. A record has
//!   the core identity fields (name, architecture, version) plus ordered
//!   `requires`/`provides` relation lists.
//! - **Attributes**: free-form scalar and array values keyed by [`Key`] and
//!   [`ArrayKey`]. Writes land in a staging area first, mirroring how large
//!   batches are materialized once at the end of an import.
//!
//! Ingestion code only depends on the [`PackageStore`] trait; [`Pool`] is the
//! implementation shipped with the workspace.

pub mod error;
mod models;
mod pool;
mod store;

pub use crate::models::{ArrayKey, AttrValue, Id, Key, RecordId, RecordView, RelOp, Relation, StringPool};
pub use crate::pool::Pool;
pub use crate::store::PackageStore;
