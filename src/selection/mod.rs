//! Language and file selection.
//!
//! * [`validate`] — the pure upload rule (type → too large → empty).
//! * [`FileCandidate`] — a file offered by the picker or a drop.
//! * [`SelectionManager`] — owns [`Selection`] and applies user choices.

pub mod manager;
pub mod validate;

pub use manager::{FileSource, Selection, SelectionManager, AUTO_LANGUAGE};
pub use validate::{
    media_type_for_extension, validate, FileCandidate, RejectReason, ValidationOutcome,
    ACCEPTED_MEDIA_TYPES, MAX_UPLOAD_BYTES,
};
