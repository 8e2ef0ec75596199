//! The notebook service
//!
//! Owns the one inverted index and the doc-id → snapshot map for a
//! notes directory, keeps them reconciled with the files on disk, and
//! serves ranked, highlighted search results. Note CRUD goes straight
//! to the filesystem; the index catches up on the next sync because
//! the directory, not the index, is the source of truth.

mod highlight;
pub mod types;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::time::Instant;

use crate::error::{FlatmarkError, Result};
use crate::index::{Hit, InvertedIndex};
use crate::note::{extract_tags, is_valid_title, NoteDocument};
use crate::store::NoteStore;

pub use types::{Note, NotePatch, Order, SearchResult, SortBy};

/// Index plus document snapshots, always mutated together
struct IndexState {
    index: InvertedIndex,
    docs: HashMap<String, NoteDocument>,
}

impl IndexState {
    fn new() -> Self {
        IndexState {
            index: InvertedIndex::new(),
            docs: HashMap::new(),
        }
    }
}

/// Service handle over one notes directory.
///
/// Cheap to share behind an `Arc`; all operations take `&self`.
/// Searches run concurrently under a read lock while sync and index
/// mutation serialize under the write lock.
pub struct Notebook {
    store: NoteStore,
    state: RwLock<IndexState>,
}

impl Notebook {
    /// Open a notebook over an existing directory and build the
    /// initial index from its files.
    #[tracing::instrument(skip(dir), fields(dir = %dir.display()))]
    pub fn open(dir: &Path) -> Result<Self> {
        let store = NoteStore::open(dir)?;
        let notebook = Notebook {
            store,
            state: RwLock::new(IndexState::new()),
        };
        notebook.sync()?;
        Ok(notebook)
    }

    /// Reconcile the index with the directory contents.
    ///
    /// Runs under the write lock for its whole duration; callers must
    /// not hold the read lock when invoking this.
    fn sync(&self) -> Result<()> {
        let start = Instant::now();
        let mut state = self.state.write();
        reconcile(&self.store, &mut state)?;
        tracing::trace!(elapsed = ?start.elapsed(), notes = state.docs.len(), "index sync");
        Ok(())
    }

    /// Search the notes.
    ///
    /// `"*"` lists every note with a zero score. Results are ordered
    /// by score descending, then mtime descending, then title;
    /// `sort` and `order` are accepted for API compatibility but this
    /// fixed ordering is what the core implements. A `limit` of zero
    /// means unlimited.
    #[tracing::instrument(skip(self))]
    pub fn search(
        &self,
        phrase: &str,
        _sort: SortBy,
        _order: Order,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        self.sync()?;
        let state = self.state.read();

        let phrase = phrase.trim();
        let mut hits: Vec<Hit> = if phrase == "*" {
            state
                .docs
                .values()
                .map(|doc| Hit {
                    id: doc.id().to_string(),
                    score: 0.0,
                    terms: Vec::new(),
                    tags: Vec::new(),
                })
                .collect()
        } else {
            let tags: Vec<String> = extract_tags(phrase).into_iter().collect();
            state.index.search(phrase, &tags)
        };

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    let a_mtime = state.docs.get(&a.id).map(NoteDocument::modtime);
                    let b_mtime = state.docs.get(&b.id).map(NoteDocument::modtime);
                    b_mtime.cmp(&a_mtime)
                })
                .then_with(|| a.id.cmp(&b.id))
        });

        if limit > 0 {
            hits.truncate(limit);
        }

        hits.iter().map(|hit| to_search_result(&state, hit)).collect()
    }

    /// All tags across every indexed note, lowercase and sorted
    #[tracing::instrument(skip(self))]
    pub fn get_tags(&self) -> Result<BTreeSet<String>> {
        self.sync()?;
        let state = self.state.read();
        Ok(state
            .docs
            .values()
            .flat_map(|doc| doc.tags().iter().cloned())
            .collect())
    }

    /// Fetch a note straight from disk
    pub fn get_note(&self, title: &str) -> Result<Note> {
        if !is_valid_title(title) {
            return Err(FlatmarkError::title_invalid(title));
        }
        let content = self.store.read(title)?;
        let last_modified = self.store.mtime(title)?;
        Ok(Note {
            title: title.to_string(),
            last_modified,
            content,
        })
    }

    /// Create a note, failing if the title is taken
    pub fn create_note(&self, title: &str, content: &str) -> Result<Note> {
        let title = title.trim();
        if !is_valid_title(title) {
            return Err(FlatmarkError::title_invalid(title));
        }
        let last_modified = self.store.create(title, content)?;
        Ok(Note {
            title: title.to_string(),
            last_modified,
            content: content.to_string(),
        })
    }

    /// Apply a patch to a note: rename, rewrite content, or both.
    ///
    /// An absent `new_title` keeps the title; renaming to the current
    /// title is a no-op.
    pub fn update_note(&self, title: &str, patch: &NotePatch) -> Result<Note> {
        if !is_valid_title(title) {
            return Err(FlatmarkError::title_invalid(title));
        }
        if !self.store.exists(title) {
            return Err(FlatmarkError::not_found(title));
        }

        let mut current = title.to_string();
        if let Some(new_title) = patch.new_title.as_deref() {
            let new_title = new_title.trim();
            if !is_valid_title(new_title) {
                return Err(FlatmarkError::title_invalid(new_title));
            }
            if new_title != current {
                self.store.rename(&current, new_title)?;
                current = new_title.to_string();
            }
        }
        if let Some(new_content) = patch.new_content.as_deref() {
            self.store.write(&current, new_content)?;
        }

        self.get_note(&current)
    }

    /// Delete a note's backing file
    pub fn delete_note(&self, title: &str) -> Result<()> {
        self.store.delete(title)
    }
}

/// Materialize one hit against the stored snapshot
fn to_search_result(state: &IndexState, hit: &Hit) -> Result<SearchResult> {
    let doc = state
        .docs
        .get(&hit.id)
        .ok_or_else(|| FlatmarkError::not_found(&hit.id))?;

    let tag_matches = hit
        .tags
        .iter()
        .filter(|tag| doc.tags().contains(*tag))
        .cloned()
        .collect();

    Ok(SearchResult {
        title: doc.title().to_string(),
        last_modified: doc.modtime(),
        score: hit.score,
        title_highlights: None,
        content_highlights: highlight::content_highlights(doc.content(), &hit.terms),
        tag_matches,
    })
}

/// Mtime-driven reconciliation of index state with the directory.
///
/// Known documents whose file vanished are dropped; files whose mtime
/// strictly advanced past the stored snapshot are re-read and
/// re-indexed (equal mtimes count as unchanged); unseen files are
/// added. Not transactional across files: a concurrently changing
/// directory yields a best-effort snapshot and a later run converges.
fn reconcile(store: &NoteStore, state: &mut IndexState) -> Result<()> {
    let known: Vec<(String, DateTime<Utc>)> = state
        .docs
        .iter()
        .map(|(id, doc)| (id.clone(), doc.modtime()))
        .collect();

    for (id, stored_modtime) in known {
        match store.mtime(&id) {
            Err(FlatmarkError::NotFound { .. }) => {
                state.index.delete(&id);
                state.docs.remove(&id);
                tracing::info!(title = %id, "removed from index");
            }
            Ok(modified) if modified > stored_modtime => {
                let doc = load_document(store, &id)?;
                state.index.delete(&id);
                state.index.add(&doc);
                state.docs.insert(id.clone(), doc);
                tracing::info!(title = %id, "updated in index");
            }
            Ok(_) => {}
            Err(err) => return Err(err),
        }
    }

    for title in store.list_titles()? {
        if state.docs.contains_key(&title) {
            continue;
        }
        let doc = load_document(store, &title)?;
        state.index.add(&doc);
        state.docs.insert(title.clone(), doc);
        tracing::info!(title = %title, "added to index");
    }

    Ok(())
}

fn load_document(store: &NoteStore, title: &str) -> Result<NoteDocument> {
    let content = store.read(title)?;
    let modtime = store.mtime(title)?;
    Ok(NoteDocument::new(title.to_string(), content, modtime))
}
