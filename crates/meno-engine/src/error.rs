use std::fmt;

use thiserror::Error;

/// A failure raised by a command handler: a missing argument, a
/// malformed block code, a rejected save. Carries a message meant for
/// the error reporter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CmdError {
    message: String,
}

impl CmdError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Which registry a command was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdKind {
    Editing,
    Altering,
}

impl fmt::Display for CmdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmdKind::Editing => f.write_str("editing"),
            CmdKind::Altering => f.write_str("altering"),
        }
    }
}

/// Everything that can go wrong between capturing a command string and
/// applying its result. All variants are non-fatal: the document state
/// is left untouched and the failure is forwarded to the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("{kind} command: {name} not found")]
    UnknownCommand { kind: CmdKind, name: String },

    #[error(transparent)]
    Handler(#[from] CmdError),

    /// A handler neither produced a new state nor signalled an error.
    #[error("something wrong with cmd logic")]
    LogicFailure,
}
