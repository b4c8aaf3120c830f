//! # Module Interface
//!
//! The seam between a filesystem projection layer and the modules that
//! populate its directories.
//!
//! A projection layer (FUSE mount, Dokan drive, remote protocol) owns the
//! directory tree and forwards list/read/write calls for paths inside a
//! module's directory to that module, with the module prefix already removed.
//! [`StatusModule`] is the `.status` module: it exposes the engine's tunables
//! and statistics as pseudo-files.
//!
//! ## Statelessness
//!
//! Modules keep nothing between calls. Every call resolves the path again,
//! touches the engine cells it needs, and returns. Calls may arrive
//! concurrently from several file handles.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::EngineState;
use crate::error::{StatusError, StatusResult};
use crate::events::StatusHooks;
use crate::registry::{self, FileSpec, SideEffect};
use crate::types::PseudoFile;

/// Directory name the `.status` module registers under.
pub const MODULE_NAME: &str = ".status";

/// A module serving one directory of the projected filesystem.
///
/// Paths are relative to the module's directory; the empty path is the
/// directory itself.
pub trait VfsModule: Send + Sync
{
    /// Directory name of this module.
    fn name(&self) -> &str;

    /// Whether the module appears in the root directory (rather than per process).
    fn is_root_module(&self) -> bool
    {
        false
    }

    /// List the directory at `path`.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: `path` is not a directory of this module
    fn list(&self, path: &str) -> StatusResult<Vec<PseudoFile>>;

    /// Read from the file at `path`, starting at `offset`.
    ///
    /// Returns the number of bytes copied into `buf`; zero at end of file.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no such file
    /// - `Invalid`: the file cannot be read right now
    fn read(&self, path: &str, buf: &mut [u8], offset: u64) -> StatusResult<usize>;

    /// Write `buf` to the file at `path`, starting at `offset`.
    ///
    /// Returns the number of bytes accepted.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no such file, or the file is read-only
    /// - `Invalid`: the payload is not acceptable for this file
    fn write(&self, path: &str, buf: &[u8], offset: u64) -> StatusResult<usize>;
}

/// The `.status` module.
#[derive(Clone)]
pub struct StatusModule
{
    state: Arc<EngineState>,
    hooks: Arc<dyn StatusHooks>,
}

impl fmt::Debug for StatusModule
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("StatusModule").field("state", &self.state).finish_non_exhaustive()
    }
}

impl StatusModule
{
    /// Create the module over the engine's state, notifying `hooks` after writes.
    #[must_use]
    pub fn new(state: Arc<EngineState>, hooks: Arc<dyn StatusHooks>) -> Self
    {
        Self { state, hooks }
    }

    /// The engine state this module exposes.
    #[must_use]
    pub fn state(&self) -> &Arc<EngineState>
    {
        &self.state
    }

    fn resolve(path: &str) -> StatusResult<&'static FileSpec>
    {
        let name = relative(path);
        registry::lookup(name).ok_or_else(|| StatusError::NotFound(name.to_string()))
    }

    fn fire(&self, file: &FileSpec)
    {
        let result = match file.effect {
            SideEffect::None => return,
            SideEffect::NotifyVerbosityChange => self.hooks.verbosity_changed(),
            SideEffect::ForceRegistryRefresh => self.hooks.refresh_registry(),
            SideEffect::ReconfigureSymbols => self.hooks.symbols_changed(),
        };
        if let Err(error) = result {
            warn!(file = file.name, effect = ?file.effect, %error, "post-write notification failed");
        }
    }
}

fn relative(path: &str) -> &str
{
    path.trim_start_matches(['/', '\\'])
}

impl VfsModule for StatusModule
{
    fn name(&self) -> &str
    {
        MODULE_NAME
    }

    fn is_root_module(&self) -> bool
    {
        true
    }

    fn list(&self, path: &str) -> StatusResult<Vec<PseudoFile>>
    {
        let path = relative(path);
        if !path.is_empty() {
            return Err(StatusError::NotFound(path.to_string()));
        }
        Ok(registry::FILES.iter().map(|file| file.describe(&self.state)).collect())
    }

    fn read(&self, path: &str, buf: &mut [u8], offset: u64) -> StatusResult<usize>
    {
        let file = Self::resolve(path)?;
        let result = file.read(&self.state, buf, offset);
        debug!(file = file.name, offset, len = buf.len(), ?result, "status read");
        result
    }

    fn write(&self, path: &str, buf: &[u8], offset: u64) -> StatusResult<usize>
    {
        let file = Self::resolve(path)?;
        if !file.mode.is_writable() {
            return Err(StatusError::NotFound(file.name.to_string()));
        }
        if buf.is_empty() {
            return Ok(0);
        }
        let result = file.write(&self.state, buf, offset);
        debug!(file = file.name, offset, len = buf.len(), ?result, "status write");
        if result.is_ok() || file.effect.fires_on_failure() {
            self.fire(file);
        }
        result
    }
}

/// Create the `.status` module behind the [`VfsModule`] interface.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use statusfs_core::engine::EngineState;
/// use statusfs_core::events::NoopHooks;
/// use statusfs_core::module::create_status_module;
///
/// let module = create_status_module(Arc::new(EngineState::default()), Arc::new(NoopHooks));
/// let mut buf = [0u8; 1];
/// assert_eq!(module.read("config_cache_enable", &mut buf, 0)?, 1);
/// assert_eq!(&buf, b"1");
/// # Ok::<(), statusfs_core::error::StatusError>(())
/// ```
#[must_use]
pub fn create_status_module(state: Arc<EngineState>, hooks: Arc<dyn StatusHooks>) -> Box<dyn VfsModule>
{
    Box::new(StatusModule::new(state, hooks))
}
