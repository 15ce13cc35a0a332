//! Shared domain primitives.

pub mod error;
