//! # Todo Service Redis
//!
//! [`TodoStore`](todo_service_core::TodoStore) implementation backed by
//! Redis Stack: todos are RedisJSON documents and every finder is a
//! RediSearch query.
//!
//! ## Modules
//!
//! - [`store`]: [`RedisTodoStore`] and its [`StoreSettings`]
//! - [`query`]: query-string builders, one per finder
//! - [`index`]: the `FT.CREATE` definition
//! - [`document`]: stored JSON shape
//! - [`reply`]: decoding of search and JSON replies

pub mod document;
pub mod index;
pub mod query;
pub mod reply;
pub mod store;

pub use store::{RedisTodoStore, StoreSettings};
