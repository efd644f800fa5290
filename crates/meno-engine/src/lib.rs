//! Command-mode engine for the meno editor: trigger detection, the
//! inline/panel mode machine, command parsing and dispatch, and the
//! default command registries.
//!
//! The document model lives in `meno-core`; this crate layers the
//! keystroke-driven command surface on top of it.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod extract;
pub mod invocation;
pub mod panel;
pub mod parse;
pub mod registry;

pub use crate::commands::*;
pub use crate::config::*;
pub use crate::dispatch::*;
pub use crate::engine::*;
pub use crate::error::*;
pub use crate::extract::*;
pub use crate::invocation::*;
pub use crate::panel::*;
pub use crate::parse::*;
pub use crate::registry::*;
