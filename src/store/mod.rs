//! Filesystem store for notes
//!
//! A store is a single flat directory of `<title>.md` files, one
//! level deep. The store knows nothing about indexing or title
//! validity; it maps titles to paths and surfaces filesystem errors
//! as typed store errors. The files on disk are always the source of
//! truth.

use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{FlatmarkError, Result};

/// File extension of every note
pub const MARKDOWN_EXT: &str = "md";

/// Flat directory of markdown note files
#[derive(Debug)]
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    /// Open a store over an existing directory
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(FlatmarkError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        Ok(NoteStore {
            dir: dir.to_path_buf(),
        })
    }

    /// The notes directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file backing a title
    pub fn note_path(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{title}.{MARKDOWN_EXT}"))
    }

    /// Whether a file backs the given title
    pub fn exists(&self, title: &str) -> bool {
        self.note_path(title).is_file()
    }

    /// Titles of every `*.md` file in the directory, sorted
    pub fn list_titles(&self) -> Result<Vec<String>> {
        let mut titles = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MARKDOWN_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                titles.push(stem.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }

    /// Full contents of a note file
    pub fn read(&self, title: &str) -> Result<String> {
        match fs::read_to_string(self.note_path(title)) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(FlatmarkError::not_found(title))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Filesystem mtime of a note file
    pub fn mtime(&self, title: &str) -> Result<DateTime<Utc>> {
        let metadata = match fs::metadata(self.note_path(title)) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(FlatmarkError::not_found(title))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(DateTime::<Utc>::from(metadata.modified()?))
    }

    /// Create the note file, failing if the title is already taken.
    ///
    /// Creation is atomic (create-new), so two concurrent creates of
    /// the same title cannot both succeed. Returns the new file's
    /// mtime.
    pub fn create(&self, title: &str, content: &str) -> Result<DateTime<Utc>> {
        let path = self.note_path(title);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(FlatmarkError::title_exists(title))
            }
            Err(err) => return Err(err.into()),
        };
        file.write_all(content.as_bytes())?;
        self.mtime(title)
    }

    /// Overwrite an existing note file
    pub fn write(&self, title: &str, content: &str) -> Result<()> {
        if !self.exists(title) {
            return Err(FlatmarkError::not_found(title));
        }
        fs::write(self.note_path(title), content)?;
        Ok(())
    }

    /// Rename a note file to a free title
    pub fn rename(&self, old: &str, new: &str) -> Result<()> {
        if !self.exists(old) {
            return Err(FlatmarkError::not_found(old));
        }
        if self.exists(new) {
            return Err(FlatmarkError::title_exists(new));
        }
        fs::rename(self.note_path(old), self.note_path(new))?;
        Ok(())
    }

    /// Remove a note file
    pub fn delete(&self, title: &str) -> Result<()> {
        match fs::remove_file(self.note_path(title)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(FlatmarkError::not_found(title))
            }
            Err(err) => Err(err.into()),
        }
    }
}
