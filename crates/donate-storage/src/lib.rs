//! Storage layer for donated data
//!
//! This crate provides:
//! - The `StorageSink` trait every upload destination implements
//! - A local backend: SQLite folder registry plus content-addressable blobs
//! - The per-donor folder layout

pub mod blob;
pub mod db;
pub mod error;
pub mod layout;
pub mod models;
pub mod sink;

pub use blob::BlobStore;
pub use db::Storage;
pub use error::{Result, StorageError};
pub use layout::DonationFolders;
pub use models::{FileRecord, FolderId};
pub use sink::StorageSink;
