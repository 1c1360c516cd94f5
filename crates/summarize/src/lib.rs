//! Client for the optional external summarization endpoint.
//!
//! The case-timeline reader sends a page of note texts and renders the
//! returned summary verbatim. Absence or failure of this endpoint must never
//! break the feature: callers fall back to the local digest in
//! `casenotes-core` instead of retrying here.

mod client;
mod error;
mod types;

pub use client::SummarizeClient;
pub use error::SummarizeError;
