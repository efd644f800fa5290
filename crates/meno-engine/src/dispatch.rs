use std::sync::Arc;

use meno_core::{EditorState, SelectionRange, StyleSet};

use crate::error::{CmdKind, DispatchError};
use crate::invocation::{CmdInvocation, EditorTriggers};
use crate::parse::{ParsedCmd, parse_inline, parse_panel};
use crate::registry::{CmdDescriptor, CmdRegistry};

/// Sink for non-fatal command failures. The default logs through
/// `tracing`; hosts are expected to override it with their own UI.
pub type ErrorReporter = Arc<dyn Fn(&DispatchError) + Send + Sync>;

pub fn default_reporter() -> ErrorReporter {
    Arc::new(|error| tracing::error!(%error, "command failed"))
}

/// Outcome of the altering (panel) dispatch path.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelDispatch {
    /// Handler succeeded; apply the state and close the panel.
    Applied(EditorState),
    /// Command entry was abandoned; apply the prompt-char replacement
    /// and close the panel.
    Cancelled(EditorState),
    /// Failure was reported; the panel stays open, state untouched.
    Failed,
}

/// Parses a captured command, resolves it against a registry, invokes
/// the handler under the shared execution contract, and reports every
/// failure exactly once.
pub struct Dispatcher {
    triggers: Arc<EditorTriggers>,
    reporter: ErrorReporter,
}

impl Dispatcher {
    pub fn new(triggers: EditorTriggers, reporter: Option<ErrorReporter>) -> Self {
        Self {
            triggers: Arc::new(triggers),
            reporter: reporter.unwrap_or_else(default_reporter),
        }
    }

    pub fn triggers(&self) -> &Arc<EditorTriggers> {
        &self.triggers
    }

    /// Editing path: `cmd_range` is the span carrying the
    /// command-in-progress tag. Returns the state to install, or
    /// `None` after a reported failure.
    pub async fn dispatch_inline(
        &self,
        registry: &CmdRegistry,
        state: &EditorState,
        cmd_range: &SelectionRange,
    ) -> Option<EditorState> {
        let prompt_char = registry.prompt_char();
        let full = state
            .block(&cmd_range.block_key)?
            .text_in(cmd_range.start()..cmd_range.end())
            .to_string();

        match parse_inline(&full, prompt_char) {
            ParsedCmd::Cancelled => {
                // Undo the styling: the trigger becomes plain text.
                Some(state.replace_text(cmd_range, &prompt_char.to_string(), StyleSet::new()))
            }
            ParsedCmd::Command { name, argument } => {
                let Some(descriptor) = registry.descriptor(name) else {
                    self.report(DispatchError::UnknownCommand {
                        kind: CmdKind::Editing,
                        name: name.to_string(),
                    });
                    return None;
                };
                tracing::debug!(name, argument, is_async = descriptor.is_async(), "dispatching editing command");
                let invocation = CmdInvocation {
                    state: state.clone(),
                    range: cmd_range.clone(),
                    argument: argument.map(str::to_string),
                    triggers: self.triggers.clone(),
                    inline_argument: None,
                };
                self.run(descriptor, invocation).await
            }
        }
    }

    /// Altering path: `full_text` comes from the panel buffer and
    /// `ambient_range` is the pre-existing selection the command
    /// operates on.
    pub async fn dispatch_panel(
        &self,
        registry: &CmdRegistry,
        state: &EditorState,
        ambient_range: &SelectionRange,
        full_text: &str,
    ) -> PanelDispatch {
        let prompt_char = registry.prompt_char();

        match parse_panel(full_text, prompt_char) {
            ParsedCmd::Cancelled => PanelDispatch::Cancelled(state.replace_text(
                ambient_range,
                &prompt_char.to_string(),
                StyleSet::new(),
            )),
            ParsedCmd::Command { name, argument } => {
                let Some(descriptor) = registry.descriptor(name) else {
                    self.report(DispatchError::UnknownCommand {
                        kind: CmdKind::Altering,
                        name: name.to_string(),
                    });
                    return PanelDispatch::Failed;
                };
                tracing::debug!(name, argument, is_async = descriptor.is_async(), "dispatching altering command");
                let inline_argument = state
                    .block(&ambient_range.block_key)
                    .map(|block| block.text_in(ambient_range.start()..ambient_range.end()).to_string());
                let invocation = CmdInvocation {
                    state: state.clone(),
                    range: ambient_range.clone(),
                    argument: argument.map(str::to_string),
                    triggers: self.triggers.clone(),
                    inline_argument,
                };
                match self.run(descriptor, invocation).await {
                    Some(next) => PanelDispatch::Applied(next),
                    None => PanelDispatch::Failed,
                }
            }
        }
    }

    /// Shared execution contract: await the handler uniformly, apply at
    /// most one result, report every failure exactly once.
    pub(crate) async fn run(
        &self,
        descriptor: &CmdDescriptor,
        invocation: CmdInvocation,
    ) -> Option<EditorState> {
        match descriptor.invoke(invocation).await {
            Ok(Some(next)) => Some(next),
            Ok(None) => {
                self.report(DispatchError::LogicFailure);
                None
            }
            Err(err) => {
                self.report(DispatchError::Handler(err));
                None
            }
        }
    }

    pub(crate) fn report(&self, error: DispatchError) {
        (self.reporter)(&error);
    }
}
