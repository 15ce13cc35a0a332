//! Document loading progress

pub mod reporter;
