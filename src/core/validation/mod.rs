//! Request payload validation
//!
//! Payloads are normalized (see [`filters`]), then checked with
//! `validator` rules and the custom validators in [`validators`], all before
//! a handler sees them.

pub mod extractor;
pub mod filters;
pub mod validators;

pub use extractor::ValidatedJson;
pub use filters::Normalize;
