//! Models module
//!
//! Typed records returned by the graph, recommendations and datasets APIs.
//! Records deserialize from whatever projection the server returned: every
//! field is optional and unknown keys are ignored.

mod author;
mod autocomplete;
mod dataset;
mod paper;
mod reference;

pub use author::Author;
pub use autocomplete::Autocomplete;
pub use dataset::{Dataset, DatasetDiff, IncrementalUpdate, Release};
pub use paper::{
    Embedding, Journal, OpenAccessPdf, Paper, PublicationVenue, S2FieldOfStudy, Tldr,
};
pub use reference::{
    reference_projection, Citation, Reference, ReferenceContext, REFERENCE_FIELDS,
};
