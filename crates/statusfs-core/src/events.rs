//! Post-write notifications and helpers.
//!
//! Some writes must be propagated to another subsystem once the value is in
//! place: a new verbosity level, a registry cache that should be refreshed
//! right away, or symbol settings that the symbol subsystem has to re-read.
//! The engine supplies a [`StatusHooks`] implementation; higher layers that
//! prefer a queue can use [`event_channel`] and consume [`StatusEvent`]s.
//!
//! Hooks are fire-and-forget. Their errors are logged by the caller and never
//! change the outcome of the write that triggered them.

use std::sync::mpsc;

use crate::error::{StatusError, StatusResult};

/// Receivers of post-write notifications.
///
/// All methods default to doing nothing.
pub trait StatusHooks: Send + Sync
{
    /// One of the `config_printf_*` flags changed.
    fn verbosity_changed(&self) -> StatusResult<()>
    {
        Ok(())
    }

    /// The registry cache should be refreshed now rather than on its next tick.
    fn refresh_registry(&self) -> StatusResult<()>
    {
        Ok(())
    }

    /// A symbol setting was written; re-read all of them together.
    fn symbols_changed(&self) -> StatusResult<()>
    {
        Ok(())
    }
}

/// Hooks that ignore every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl StatusHooks for NoopHooks {}

/// Notification emitted after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent
{
    /// Verbosity flags changed.
    VerbosityChanged,
    /// Registry refresh requested.
    RegistryRefresh,
    /// Symbol settings changed.
    SymbolsChanged,
}

impl StatusEvent
{
    /// Human-readable description of the event.
    #[must_use]
    pub fn describe(self) -> &'static str
    {
        match self {
            Self::VerbosityChanged => "Verbosity changed",
            Self::RegistryRefresh => "Registry refresh requested",
            Self::SymbolsChanged => "Symbol configuration changed",
        }
    }
}

/// Sender side of the status event channel.
pub type StatusEventSender = mpsc::Sender<StatusEvent>;
/// Receiver side of the status event channel.
pub type StatusEventReceiver = mpsc::Receiver<StatusEvent>;

/// Create a new status event channel.
#[must_use]
pub fn event_channel() -> (StatusEventSender, StatusEventReceiver)
{
    mpsc::channel()
}

fn send(sender: &StatusEventSender, event: StatusEvent) -> StatusResult<()>
{
    sender
        .send(event)
        .map_err(|_| StatusError::HookFailed(format!("{}: receiver dropped", event.describe())))
}

// `mpsc::Sender` is `Sync` since Rust 1.72.
impl StatusHooks for StatusEventSender
{
    fn verbosity_changed(&self) -> StatusResult<()>
    {
        send(self, StatusEvent::VerbosityChanged)
    }

    fn refresh_registry(&self) -> StatusResult<()>
    {
        send(self, StatusEvent::RegistryRefresh)
    }

    fn symbols_changed(&self) -> StatusResult<()>
    {
        send(self, StatusEvent::SymbolsChanged)
    }
}
