//! Books: records, metadata, import and incremental sync

mod importer;
mod metadata;
mod model;
mod sync;

pub use importer::BookImporter;
pub use metadata::{clean_title, parse_metadata, BookMetadata, UNKNOWN_AUTHOR, UNTITLED_BOOK};
pub use model::{book_id, chapter_identity, Book, Chapter};
pub use sync::{appended_chapters, IncrementalSync};
