//! The tagging session — one image record in progress.
//!
//! A [`Session`] owns the draft record being edited, the handle to the loaded
//! source image, and per-category input buffers. It is the one place where
//! working state mutates; the store and the packager only ever see finalized
//! records.
//!
//! ## Session state machine
//!
//! ```text
//! Idle ──load_image──▶ ImageLoaded ──(add / set_*, any order)──▶ ImageLoaded
//!   ▲                       │
//!   │◀──────cancel──────────┤
//!   └───────save────────────┘
//! ```
//!
//! `save` with no image loaded is a deliberate no-op (`Ok(None)`): the save
//! control is always available and pressing it early must not create empty
//! records or touch the store. Export is orthogonal — it reads the persisted
//! collection, never this session.
//!
//! ## Categories
//!
//! Most categories are ordered lists where repeats are meaningful members.
//! Character sexes and races are tallied instead: adding "female" twice means
//! two female characters, and the buffer keeps the count rather than the
//! repetition. [`Session::display`] renders either kind as the comma-joined
//! string the view shows next to the input.
//!
//! ## Change notification
//!
//! The engine never depends on a view. Interested front ends pass an
//! `mpsc::Sender<SessionEvent>` at construction and receive an event for
//! every observable change, same as they would subscribe to property-change
//! notifications in a binding framework.

use crate::imaging::{
    ImageBackend, THUMB_TALL_EDGE, THUMB_WIDE_EDGE, ThumbnailParams, thumbnail_dimensions,
};
use crate::record::{CharacterBundle, ImageRecord, Rating, TagBundle, TextBlock};
use crate::store::{Store, StoreError};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Backend(#[from] crate::imaging::BackendError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Image file has no extension: {0}")]
    NoExtension(PathBuf),
}

/// A taxonomy category accepting "add to list" input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Parodies,
    Poses,
    Clothes,
    Sexes,
    Others,
    /// Character names.
    Names,
    /// Generic character attributes.
    Attributes,
    /// Frequency-counted: number of characters of each sex.
    CharacterSexes,
    /// Frequency-counted: number of characters of each race.
    Races,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Parodies,
        Category::Poses,
        Category::Clothes,
        Category::Sexes,
        Category::Others,
        Category::Names,
        Category::Attributes,
        Category::CharacterSexes,
        Category::Races,
    ];

    /// Whether adds tally a counter instead of extending a list.
    pub fn is_frequency_counted(self) -> bool {
        matches!(self, Category::CharacterSexes | Category::Races)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Parodies => "parodies",
            Category::Poses => "poses",
            Category::Clothes => "clothes",
            Category::Sexes => "sexes",
            Category::Others => "others",
            Category::Names => "names",
            Category::Attributes => "attributes",
            Category::CharacterSexes => "character sexes",
            Category::Races => "races",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observable state changes, for front ends that subscribe.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ImageLoaded {
        id: String,
        width: u32,
        height: u32,
    },
    CategoryChanged {
        category: Category,
        display: String,
    },
    RecordSaved {
        id: String,
        collection_size: usize,
    },
    Cancelled,
}

/// The source image currently being tagged.
#[derive(Debug, Clone)]
struct LoadedImage {
    path: PathBuf,
    width: u32,
    height: u32,
}

/// Scalar fields of the draft, set directly rather than through buffers.
#[derive(Debug, Clone, Default)]
struct Draft {
    id: String,
    format: String,
    parent: String,
    author: String,
    rating: Rating,
    title: String,
    comment: String,
    text_lang: String,
    text_lines: Vec<String>,
}

/// Per-category input buffers accumulated between load and save.
#[derive(Debug, Clone, Default)]
struct Buffers {
    parodies: Vec<String>,
    poses: Vec<String>,
    clothes: Vec<String>,
    sexes: Vec<String>,
    others: Vec<String>,
    names: Vec<String>,
    attributes: Vec<String>,
    character_sexes: BTreeMap<String, u32>,
    races: BTreeMap<String, u32>,
}

/// What a successful save produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRecord {
    pub id: String,
    /// Collection size after the append, as reported by the store.
    pub collection_size: usize,
}

/// One in-progress tagging session. See the module docs for the state machine.
pub struct Session {
    draft: Draft,
    buffers: Buffers,
    image: Option<LoadedImage>,
    thumb_targets: (u32, u32),
    events: Option<mpsc::Sender<SessionEvent>>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_events(None)
    }

    /// Create a session that reports changes on `events`.
    pub fn with_events(events: Option<mpsc::Sender<SessionEvent>>) -> Self {
        Self {
            draft: Draft::default(),
            buffers: Buffers::default(),
            image: None,
            thumb_targets: (THUMB_WIDE_EDGE, THUMB_TALL_EDGE),
            events,
        }
    }

    /// Override the thumbnail target edges (`(wide_edge, tall_edge)`).
    ///
    /// Defaults match every previously produced export.
    pub fn set_thumbnail_targets(&mut self, targets: (u32, u32)) {
        self.thumb_targets = targets;
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            // A hung-up subscriber must not break the engine
            let _ = tx.send(event);
        }
    }

    /// Whether a source image is loaded (save would do work).
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Identifier assigned to the draft, empty until an image is loaded.
    pub fn current_id(&self) -> &str {
        &self.draft.id
    }

    /// Import a source image: identify it, assign a fresh id, reset buffers.
    ///
    /// The identifier is generated here and only here — ids are never reused,
    /// and a record carries the id minted when its image was imported. Loading
    /// a new image discards any unsaved edits, like cancel does.
    pub fn load_image(
        &mut self,
        backend: &impl ImageBackend,
        path: &Path,
    ) -> Result<(), SessionError> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| SessionError::NoExtension(path.to_path_buf()))?;

        let dims = backend.identify(path)?;

        self.reset();
        self.draft.id = uuid::Uuid::new_v4().to_string();
        self.draft.format = format;
        self.image = Some(LoadedImage {
            path: path.to_path_buf(),
            width: dims.width,
            height: dims.height,
        });

        self.emit(SessionEvent::ImageLoaded {
            id: self.draft.id.clone(),
            width: dims.width,
            height: dims.height,
        });
        Ok(())
    }

    /// Add a value to a category buffer.
    ///
    /// Values are trimmed and case-folded to lower; empty input is ignored.
    /// List categories append (duplicates are meaningful members); frequency
    /// categories increment the counter for the normalized value.
    pub fn add(&mut self, category: Category, value: &str) {
        let value = value.trim().to_lowercase();
        if value.is_empty() {
            return;
        }

        match category {
            Category::Parodies => self.buffers.parodies.push(value),
            Category::Poses => self.buffers.poses.push(value),
            Category::Clothes => self.buffers.clothes.push(value),
            Category::Sexes => self.buffers.sexes.push(value),
            Category::Others => self.buffers.others.push(value),
            Category::Names => self.buffers.names.push(value),
            Category::Attributes => self.buffers.attributes.push(value),
            Category::CharacterSexes => {
                *self.buffers.character_sexes.entry(value).or_insert(0) += 1;
            }
            Category::Races => {
                *self.buffers.races.entry(value).or_insert(0) += 1;
            }
        }

        self.emit(SessionEvent::CategoryChanged {
            category,
            display: self.display(category),
        });
    }

    /// The display string for a category buffer: comma-joined values,
    /// frequency entries rendered as `value: count`.
    pub fn display(&self, category: Category) -> String {
        fn join(list: &[String]) -> String {
            list.join(", ")
        }
        fn join_counts(map: &BTreeMap<String, u32>) -> String {
            map.iter()
                .map(|(value, count)| format!("{value}: {count}"))
                .collect::<Vec<_>>()
                .join(", ")
        }

        match category {
            Category::Parodies => join(&self.buffers.parodies),
            Category::Poses => join(&self.buffers.poses),
            Category::Clothes => join(&self.buffers.clothes),
            Category::Sexes => join(&self.buffers.sexes),
            Category::Others => join(&self.buffers.others),
            Category::Names => join(&self.buffers.names),
            Category::Attributes => join(&self.buffers.attributes),
            Category::CharacterSexes => join_counts(&self.buffers.character_sexes),
            Category::Races => join_counts(&self.buffers.races),
        }
    }

    pub fn set_author(&mut self, author: &str) {
        self.draft.author = author.trim().to_string();
    }

    pub fn set_rating(&mut self, rating: Rating) {
        self.draft.rating = rating;
    }

    pub fn set_parent(&mut self, parent: &str) {
        self.draft.parent = parent.trim().to_string();
    }

    pub fn set_title(&mut self, title: &str) {
        self.draft.title = title.trim().to_string();
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.draft.comment = comment.trim().to_string();
    }

    pub fn set_text_lang(&mut self, lang: &str) {
        self.draft.text_lang = lang.trim().to_string();
    }

    pub fn add_text_line(&mut self, line: &str) {
        self.draft.text_lines.push(line.to_string());
    }

    /// Finalize and persist the draft.
    ///
    /// No-op returning `Ok(None)` when no image is loaded. Otherwise: copies
    /// the source bytes into the store, writes the thumbnail, appends the
    /// record to the collection (rewriting `info.json` in full), resets the
    /// working state, and returns the saved id and the collection size the
    /// append reported. Already-saved records are never modified.
    pub fn save(
        &mut self,
        store: &Store,
        backend: &impl ImageBackend,
    ) -> Result<Option<SavedRecord>, SessionError> {
        let Some(image) = self.image.clone() else {
            return Ok(None);
        };

        let record = self.finalize();
        let id = record.id.clone();
        let file_name = record.file_name();

        store.ensure_layout()?;
        std::fs::copy(&image.path, store.images_dir().join(&file_name))?;

        let (width, height) =
            thumbnail_dimensions((image.width, image.height), self.thumb_targets);
        backend.thumbnail(&ThumbnailParams {
            source: image.path.clone(),
            output: store.thumbnails_dir().join(&file_name),
            width,
            height,
        })?;

        let collection_size = store.append_record(record)?;

        self.reset();
        self.emit(SessionEvent::RecordSaved {
            id: id.clone(),
            collection_size,
        });
        Ok(Some(SavedRecord {
            id,
            collection_size,
        }))
    }

    /// Discard the draft and all buffers. Never touches disk.
    pub fn cancel(&mut self) {
        self.reset();
        self.emit(SessionEvent::Cancelled);
    }

    /// Build the finalized record from the draft and buffers.
    ///
    /// Empty text inputs become unset options; frequency buffers persist as
    /// the maps they are.
    fn finalize(&mut self) -> ImageRecord {
        fn opt(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        let buffers = std::mem::take(&mut self.buffers);
        let text = (!self.draft.text_lines.is_empty()).then(|| TextBlock {
            lang: self.draft.text_lang.clone(),
            content: std::mem::take(&mut self.draft.text_lines),
        });

        ImageRecord {
            id: std::mem::take(&mut self.draft.id),
            format: std::mem::take(&mut self.draft.format),
            parent: opt(&self.draft.parent),
            author: self.draft.author.clone(),
            rating: self.draft.rating,
            text,
            tags: TagBundle {
                parodies: buffers.parodies,
                characters: CharacterBundle {
                    sexes: buffers.character_sexes,
                    names: buffers.names,
                    racial_attributes: buffers.races,
                    attributes: buffers.attributes,
                },
                poses: buffers.poses,
                clothes: buffers.clothes,
                sexes: buffers.sexes,
                others: buffers.others,
            },
            comment: opt(&self.draft.comment),
            title: opt(&self.draft.title),
        }
    }

    fn reset(&mut self) {
        self.draft = Draft::default();
        self.buffers = Buffers::default();
        self.image = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
