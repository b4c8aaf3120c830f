//! Pseudo-file descriptors returned by directory listings.

use std::fmt;

/// Whether a pseudo-file accepts writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode
{
    /// Reads only; writes fail with `NotFound`
    ReadOnly,
    /// Reads and writes
    ReadWrite,
}

impl AccessMode
{
    /// Returns `true` if writes are accepted.
    #[must_use]
    pub fn is_writable(self) -> bool
    {
        self == Self::ReadWrite
    }
}

/// How a pseudo-file's content is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind
{
    /// One ASCII byte, `'1'` or `'0'`
    Boolean,
    /// Eight lowercase hex digits
    UInt32,
    /// Sixteen lowercase hex digits
    UInt64,
    /// Raw bytes: a stored string or a rendered report
    ByteBuffer,
}

impl ValueKind
{
    /// Encoded width of fixed-size kinds, `None` for byte buffers.
    #[must_use]
    pub fn fixed_width(self) -> Option<u64>
    {
        match self {
            Self::Boolean => Some(1),
            Self::UInt32 => Some(8),
            Self::UInt64 => Some(16),
            Self::ByteBuffer => None,
        }
    }
}

/// One entry of a directory listing.
///
/// `size` is computed when the listing is produced. For text settings and
/// reports it is the length a read would return at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoFile
{
    /// File name, as registered
    pub name: &'static str,
    /// Size in bytes
    pub size: u64,
    /// Read-only or read-write
    pub mode: AccessMode,
    /// Content encoding
    pub kind: ValueKind,
}

impl PseudoFile
{
    /// Create a new descriptor.
    #[must_use]
    pub fn new(name: &'static str, size: u64, mode: AccessMode, kind: ValueKind) -> Self
    {
        Self { name, size, mode, kind }
    }
}

impl fmt::Display for PseudoFile
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let mode = match self.mode {
            AccessMode::ReadOnly => "r-",
            AccessMode::ReadWrite => "rw",
        };
        write!(f, "{mode} {:>8} {}", self.size, self.name)
    }
}
