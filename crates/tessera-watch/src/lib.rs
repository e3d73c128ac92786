//! Source directory watching for tessera development builds.
//!
//! One watcher covers all configured source categories; change events are
//! classified by the directory they fall under and coalesced per category by
//! a cancellable deferred-task debouncer.

pub mod debounce;
pub mod watcher;

pub use debounce::Debouncer;
pub use watcher::{Category, ChangeEvent, FileWatcher, WatchError};
