//! Caller-side sync jobs
//!
//! Background syncs run at most once per book, retry a bounded number of
//! times and can be cancelled when the book is removed. A bookshelf refresh
//! syncs many books with a bounded number in flight.

mod registry;

pub use registry::{SyncHandle, SyncRegistry};
