//! # Pseudo-File Types
//!
//! Types describing the pseudo-files the `.status` module exposes.

pub mod file;

pub use file::{AccessMode, PseudoFile, ValueKind};
