//! Source store (C1): validated per-source frame matrices.

pub mod store;

pub use store::{Source, SourceStore};
