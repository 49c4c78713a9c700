//! Reactive store primitives

pub mod cell;
pub mod erased;

pub use cell::{Store, StoreSubscription};
pub use erased::{StateCell, WatchHandle};
