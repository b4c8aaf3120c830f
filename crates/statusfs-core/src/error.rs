//! # Error Types
//!
//! Error handling for the `.status` pseudo-file surface.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

/// Main error type for pseudo-file operations
///
/// The surface has a small taxonomy. A caller projecting the
/// namespace as a directory turns any of these into a generic I/O error.
///
/// ## Error Categories
///
/// 1. **Lookup errors**: NotFound (unknown name, non-root directory, or a write
///    to a read-only name; there is no separate "permission denied")
/// 2. **Structural errors**: Invalid (wrong offset, value out of bounds, a
///    report that is not being collected)
/// 3. **Notification errors**: HookFailed (only ever produced by hook
///    implementations; the facade logs and drops it)
///
/// Reading past the end of a file is not an error: it succeeds with zero
/// bytes transferred.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError
{
    /// The path does not name a registered pseudo-file
    ///
    /// This happens when:
    /// - The name is not in the registry
    /// - A listing is requested for anything other than the module root
    /// - A write targets a read-only file
    #[error("File not found: {0}")]
    NotFound(String),

    /// The operation is structurally wrong for the target
    ///
    /// Examples:
    /// - Writing a boolean or integer at a non-zero offset
    /// - Writing an integer below its minimum when no default is declared
    /// - Reading `statistics_fncall` while call statistics are disabled
    #[error("File invalid: {0}")]
    Invalid(String),

    /// A post-write notification could not be delivered
    #[error("Hook failed: {0}")]
    HookFailed(String),
}

impl StatusError
{
    /// Returns `true` for the not-found class (unknown name or read-only target).
    #[must_use]
    pub fn is_not_found(&self) -> bool
    {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` for the invalid class.
    #[must_use]
    pub fn is_invalid(&self) -> bool
    {
        matches!(self, Self::Invalid(_))
    }
}

/// Convenience type alias for `Result<T, StatusError>`
///
/// ```rust
/// use statusfs_core::error::StatusResult;
/// fn foo() -> StatusResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type StatusResult<T> = std::result::Result<T, StatusError>;
