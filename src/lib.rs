//! Flatmark Core Library
//!
//! Full-text search and indexing core for a self-hosted notes service
//! whose notes are plain markdown files in one flat directory. The
//! [`notebook::Notebook`] service keeps an in-memory inverted index
//! reconciled with the directory by file mtime and serves ranked,
//! highlighted search results with tag filtering. HTTP wiring,
//! authentication, and rendering live in the embedding application.

pub mod error;
pub mod index;
pub mod logging;
pub mod note;
pub mod notebook;
pub mod store;
pub mod text;
