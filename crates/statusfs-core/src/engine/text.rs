//! Fixed-capacity text cells (symbol cache path, symbol server URL).

use std::fmt;
use std::sync::{PoisonError, RwLock};

/// A fixed-capacity byte buffer holding a C-style string.
///
/// `capacity` counts the terminator, so at most `capacity - 1` content bytes
/// are ever stored. The logical string ends at the first NUL.
///
/// Writers take the lock for the whole read-modify-write, but a reader that
/// lists the length and then reads the content takes the lock twice and may
/// observe two different values.
pub struct TextBuffer
{
    capacity: usize,
    content: RwLock<Vec<u8>>,
}

impl TextBuffer
{
    /// Create a buffer with `capacity` bytes (terminator included) and an initial value.
    #[must_use]
    pub fn new(capacity: usize, initial: &str) -> Self
    {
        let buffer = Self {
            capacity,
            content: RwLock::new(Vec::with_capacity(capacity)),
        };
        buffer.update(|content| content.extend_from_slice(initial.as_bytes()));
        buffer
    }

    /// Total capacity in bytes, terminator included.
    #[must_use]
    pub fn capacity(&self) -> usize
    {
        self.capacity
    }

    /// Maximum number of content bytes.
    #[must_use]
    pub fn max_len(&self) -> usize
    {
        self.capacity.saturating_sub(1)
    }

    /// Current string length.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.with_bytes(<[u8]>::len)
    }

    /// Returns `true` if the stored string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    /// Run `f` over the current content without copying it.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R
    {
        let content = self.content.read().unwrap_or_else(PoisonError::into_inner);
        f(&content)
    }

    /// Mutate the content under the write lock.
    ///
    /// The capacity and NUL-termination rules are re-applied after `f` runs,
    /// whatever it did to the vector.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<u8>) -> R) -> R
    {
        let mut content = self.content.write().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut content);
        if let Some(nul) = content.iter().position(|&b| b == 0) {
            content.truncate(nul);
        }
        content.truncate(self.max_len());
        result
    }

    /// Replace the whole content with `value`.
    pub fn set(&self, value: &str)
    {
        self.update(|content| {
            content.clear();
            content.extend_from_slice(value.as_bytes());
        });
    }

    /// Current content as a (lossily decoded) `String`.
    #[must_use]
    pub fn to_string_lossy(&self) -> String
    {
        self.with_bytes(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl fmt::Debug for TextBuffer
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("TextBuffer")
            .field("capacity", &self.capacity)
            .field("content", &self.to_string_lossy())
            .finish()
    }
}
