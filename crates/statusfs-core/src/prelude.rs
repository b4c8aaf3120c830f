//! Common module for library exports

pub use crate::engine::{BoolSetting, EngineConfig, EngineState, TextSetting, U32Setting, U64Setting};
pub use crate::error::{StatusError, StatusResult};
pub use crate::events::{event_channel, NoopHooks, StatusEvent, StatusHooks};
pub use crate::module::{create_status_module, StatusModule, VfsModule, MODULE_NAME};
pub use crate::types::{AccessMode, PseudoFile, ValueKind};
