//! Document assembly, rendering, and the end-to-end `generate` pipeline.
//!
//! This crate ties together user discovery, document assembly, and the
//! renderers that turn the document into files.

pub mod assembler;
pub mod output;
pub mod pipeline;
pub mod render;
