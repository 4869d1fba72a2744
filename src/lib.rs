//! # tagpack
//!
//! Structured image tagging: build a metadata collection one image at a time,
//! generate thumbnails, and pack everything into a single archive.
//!
//! # Architecture: Session → Store → Archive
//!
//! ```text
//! 1. Session   image + tag input  →  finalized ImageRecord
//! 2. Store     record             →  export/ tree (info.json, images, thumbnails)
//! 3. Export    export/ tree       →  export.zip + fresh empty tree
//! ```
//!
//! A [`session::Session`] owns exactly one in-progress record: importing an
//! image mints a fresh id, tag input accumulates in per-category buffers, and
//! an explicit save finalizes the record, writes the image copy and its
//! thumbnail, and appends to the collection. The collection file is rewritten
//! in full on every save so `export/info.json` is always valid JSON. Export
//! zips the whole tree and resets it for the next session.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | The aggregation engine: draft record, category buffers, save/cancel |
//! | [`record`] | Persisted data model — [`record::ImageRecord`] and its tag bundles |
//! | [`store`] | Working-tree layout and collection persistence under an explicit root |
//! | [`choices`] | Distinct-value derivation from an imported collection |
//! | [`export`] | Archive packaging and working-tree reset |
//! | [`imaging`] | Thumbnail dimension policy + `image`-crate backend behind a trait |
//! | [`config`] | `tagpack.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit storage root
//!
//! Every path hangs off a [`store::Store`] constructed with a root directory.
//! There are no ambient `export/...` relative paths; tests run entire
//! sessions inside a temp directory and the CLI picks the root from a flag or
//! `tagpack.toml`.
//!
//! ## Frequency maps stay maps
//!
//! Character sexes and races are tallied during input ("female: 2") and
//! persist as JSON maps. Flattening them to lists would throw the counts
//! away; keeping the map makes re-import lossless.
//!
//! ## Errors are values, not debugger breaks
//!
//! Every fallible operation returns a per-module `thiserror` enum. The one
//! deliberate silent path is save-with-no-image, which returns `Ok(None)`:
//! the save control is always reachable and pressing it early is not a
//! fault. Malformed entries in an imported collection are skipped
//! individually and the skip count is reported to the caller.
//!
//! ## View seam, not a view
//!
//! The engine never renders anything. Front ends subscribe to
//! [`session::SessionEvent`] over an mpsc channel and read display strings
//! from [`session::Session::display`]; the bundled CLI is just one such
//! front end.

pub mod choices;
pub mod config;
pub mod export;
pub mod imaging;
pub mod output;
pub mod record;
pub mod session;
pub mod store;
