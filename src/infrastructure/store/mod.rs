//! Media cache implementations.
//!
//! - [`FsContentStore`] - One file per key in a cache directory

mod fs_content_store;

pub use fs_content_store::FsContentStore;
