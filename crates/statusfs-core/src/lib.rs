//! # statusfs-core
//!
//! Typed pseudo-file access to the live state of a memory introspection engine.
//!
//! The engine owns its tunables (cache and paging switches, refresh intervals,
//! symbol settings, verbosity) and its statistics counters. This crate exposes
//! them as a flat directory of small files that a filesystem projection layer
//! can list, read, and write with ordinary offset/length semantics:
//!
//! - [`accessor`]: positioned read/write of booleans, hex integers, and byte buffers
//! - [`registry`]: the fixed name → accessor table
//! - [`report`]: the statistics reports rendered on each read
//! - [`module`]: the list/read/write facade the projection layer calls
//! - [`events`]: notifications fired after selected writes
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use statusfs_core::prelude::*;
//!
//! let state = Arc::new(EngineState::default());
//! let module = StatusModule::new(state.clone(), Arc::new(NoopHooks));
//!
//! module.write("config_paging_enable", b"0", 0)?;
//! assert!(!state.load_bool(BoolSetting::PagingEnable));
//! # Ok::<(), StatusError>(())
//! ```

pub mod accessor;
pub mod engine;
pub mod error;
pub mod events;
pub mod module;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod types;

pub use engine::{EngineConfig, EngineState};
// Re-export commonly used types
pub use error::{StatusError, StatusResult};
pub use module::{StatusModule, VfsModule};
pub use types::{AccessMode, PseudoFile, ValueKind};
