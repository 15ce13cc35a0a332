//! Document sources and the normalized text they produce.
//!
//! - [`entities::SourceKind`]: the seven kinds of input Sofia can read
//! - [`entities::DocumentSource`]: a kind plus a location (URL, video id, path)
//! - [`entities::Document`]: the single text blob handed to the model

pub mod entities;
