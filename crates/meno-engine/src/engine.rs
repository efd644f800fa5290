use meno_core::{EditorState, Generation, SelectionRange, StyleSet, StyleTag};

use crate::commands::{SAVE_CMD, default_altering_registry, default_editing_registry};
use crate::config::EngineConfig;
use crate::dispatch::{Dispatcher, PanelDispatch};
use crate::error::{CmdKind, DispatchError};
use crate::extract::styled_range;
use crate::invocation::CmdInvocation;
use crate::panel::{PanelAction, PanelController, PanelKey};
use crate::registry::CmdRegistry;

/// The command-entry mode. Exactly one is active; transitions happen
/// only through [`MenoEngine`] methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandMode {
    Normal,
    /// Composing an inline command; carries the span where the prompt
    /// character was inserted and tagged.
    Inline { prompt_range: SelectionRange },
    /// The modal input is open, collecting a free-text command.
    Panel(PanelController),
}

impl CommandMode {
    pub fn is_normal(&self) -> bool {
        matches!(self, CommandMode::Normal)
    }
}

/// Whether the engine consumed a keystroke or leaves it to the host's
/// default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Handled,
    NotHandled,
}

/// The editor-instance facade: owns the current document snapshot, the
/// mode machine, both merged registries, and the dispatcher.
pub struct MenoEngine {
    state: EditorState,
    mode: CommandMode,
    pending_panel_open: bool,
    editing: CmdRegistry,
    altering: CmdRegistry,
    dispatcher: Dispatcher,
}

impl MenoEngine {
    pub fn new(config: EngineConfig) -> Self {
        let editing = CmdRegistry::merged(default_editing_registry(), config.editing);
        let altering = CmdRegistry::merged(default_altering_registry(), config.altering);
        let state = match &config.initial_content {
            Some(raw) => EditorState::from_raw(raw),
            None => EditorState::empty(),
        };
        Self {
            state,
            mode: CommandMode::Normal,
            pending_panel_open: false,
            editing,
            altering,
            dispatcher: Dispatcher::new(config.triggers, config.reporter),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn mode(&self) -> &CommandMode {
        &self.mode
    }

    pub fn panel_open(&self) -> bool {
        matches!(self.mode, CommandMode::Panel(_))
    }

    pub fn panel_open_pending(&self) -> bool {
        self.pending_panel_open
    }

    pub fn editing_registry(&self) -> &CmdRegistry {
        &self.editing
    }

    pub fn altering_registry(&self) -> &CmdRegistry {
        &self.altering
    }

    /// Trigger detection, called for each character about to be
    /// inserted. `Handled` means the engine consumed the keystroke;
    /// `NotHandled` means the character is ordinary input.
    pub fn handle_before_input(&mut self, ch: char) -> InputOutcome {
        // One-shot deferred open in flight: no transition may occur.
        if self.pending_panel_open {
            return InputOutcome::NotHandled;
        }
        // The modal input owns the keyboard while it is open.
        if self.panel_open() {
            return InputOutcome::NotHandled;
        }
        // Already composing a command: the trigger is literal text.
        if self.state.current_style_set().contains(StyleTag::Command) {
            return InputOutcome::NotHandled;
        }

        if ch == self.editing.prompt_char() {
            self.enter_inline_mode();
            return InputOutcome::Handled;
        }
        if ch == self.altering.prompt_char() {
            self.enter_panel_mode();
            return InputOutcome::Handled;
        }
        InputOutcome::NotHandled
    }

    /// Host convenience for the full keystroke flow: run trigger
    /// detection and fall back to inserting the character at the caret
    /// with the current style set.
    pub fn type_char(&mut self, ch: char) -> InputOutcome {
        match self.handle_before_input(ch) {
            InputOutcome::Handled => InputOutcome::Handled,
            InputOutcome::NotHandled => {
                let selection = self.state.selection().clone();
                let styles = self.state.current_style_set();
                self.state = self
                    .state
                    .replace_text(&selection, &ch.to_string(), styles);
                InputOutcome::NotHandled
            }
        }
    }

    pub fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.type_char(ch);
        }
    }

    /// Consume the deferred open-panel transition, exactly once.
    pub fn tick(&mut self) {
        if self.pending_panel_open {
            self.pending_panel_open = false;
            self.mode = CommandMode::Panel(PanelController::new(self.altering.prompt_char()));
        }
    }

    /// Return/Enter at a collapsed caret: submit an inline command,
    /// or clear all active inline styles, or fall through to the
    /// host's newline behavior.
    pub async fn handle_return(&mut self) -> InputOutcome {
        if self.pending_panel_open || self.panel_open() {
            return InputOutcome::NotHandled;
        }
        let selection = self.state.selection().clone();
        if !selection.is_collapsed() {
            return InputOutcome::NotHandled;
        }

        let current = self.state.current_style_set();
        if current.contains(StyleTag::Command) {
            let Some(block) = self.state.block(&selection.block_key) else {
                return InputOutcome::NotHandled;
            };
            let cmd_range = styled_range(block, &StyleSet::of(StyleTag::Command));
            let token = self.state.generation();
            let outcome = self
                .dispatcher
                .dispatch_inline(&self.editing, &self.state, &cmd_range)
                .await;
            if let Some(next) = outcome {
                self.install(token, next);
            }
            self.mode = CommandMode::Normal;
            return InputOutcome::Handled;
        }

        if !current.is_empty() {
            let mut state = self.state.clone();
            for tag in current.iter() {
                state = state.toggle_inline_style(tag);
            }
            self.state = state;
            return InputOutcome::Handled;
        }

        InputOutcome::NotHandled
    }

    /// Route a keystroke to the open panel.
    pub async fn handle_panel_key(&mut self, key: PanelKey) -> InputOutcome {
        let CommandMode::Panel(panel) = &mut self.mode else {
            return InputOutcome::NotHandled;
        };
        match panel.handle_key(key) {
            PanelAction::Edited => InputOutcome::Handled,
            PanelAction::Exit => {
                self.cancel_panel();
                InputOutcome::Handled
            }
            PanelAction::Submit(full_text) => {
                self.submit_panel(&full_text).await;
                InputOutcome::Handled
            }
        }
    }

    /// Dispatch the panel buffer against the altering registry. The
    /// panel closes only on success or cancellation; a failure leaves
    /// it open for correction.
    pub async fn submit_panel(&mut self, full_text: &str) {
        let ambient = self.state.selection().clone();
        let token = self.state.generation();
        match self
            .dispatcher
            .dispatch_panel(&self.altering, &self.state, &ambient, full_text)
            .await
        {
            PanelDispatch::Applied(next) | PanelDispatch::Cancelled(next) => {
                self.install(token, next);
                self.mode = CommandMode::Normal;
            }
            PanelDispatch::Failed => {}
        }
    }

    /// Escape, click-outside, or backspacing the seed away: drop the
    /// command-in-progress tag from the current selection and force
    /// `Normal`.
    pub fn cancel_panel(&mut self) {
        let selection = self.state.selection().clone();
        self.state = self.state.remove_inline_style(&selection, StyleTag::Command);
        self.mode = CommandMode::Normal;
        self.pending_panel_open = false;
    }

    /// Host hook: invoke the save altering command outside the normal
    /// keystroke flow.
    pub async fn save(&mut self) {
        let Some(descriptor) = self.altering.descriptor(SAVE_CMD).cloned() else {
            self.dispatcher.report(DispatchError::UnknownCommand {
                kind: CmdKind::Altering,
                name: SAVE_CMD.to_string(),
            });
            return;
        };
        let token = self.state.generation();
        let invocation = CmdInvocation {
            state: self.state.clone(),
            range: self.state.selection().clone(),
            argument: None,
            triggers: self.dispatcher.triggers().clone(),
            inline_argument: None,
        };
        if let Some(next) = self.dispatcher.run(&descriptor, invocation).await {
            self.install(token, next);
        }
    }

    /// Host hook: the selection moved without a content edit.
    pub fn set_selection(&mut self, selection: SelectionRange) {
        self.state = self.state.set_selection(selection);
    }

    /// Host hook: reset the document to empty.
    pub fn clear(&mut self) {
        self.state = self.state.cleared();
        self.mode = CommandMode::Normal;
        self.pending_panel_open = false;
    }

    /// Install a dispatch result, discarding it when the snapshot it
    /// was computed against is no longer current. Returns whether the
    /// state was applied.
    pub fn install(&mut self, token: Generation, next: EditorState) -> bool {
        if self.state.generation() != token {
            tracing::warn!(?token, "discarding stale command result");
            return false;
        }
        self.state = next;
        true
    }

    fn enter_inline_mode(&mut self) {
        let selection = self.state.selection().clone();
        let prompt = self.editing.prompt_char().to_string();
        let at = selection.start();
        self.state = self
            .state
            .insert_text(&selection, &prompt, StyleSet::of(StyleTag::Command));
        let prompt_range =
            SelectionRange::new(selection.block_key.clone(), at, at + prompt.len());
        self.mode = CommandMode::Inline { prompt_range };
    }

    /// Panel-entry rule: a non-collapsed selection is tagged and the
    /// open deferred; a styled collapsed caret widens to the maximal
    /// run of its exact style set first; otherwise the panel opens
    /// immediately over an empty ambient range.
    fn enter_panel_mode(&mut self) {
        let selection = self.state.selection().clone();

        if !selection.is_collapsed() {
            self.state = self.state.apply_inline_style(&selection, StyleTag::Command);
            self.state = self.state.set_selection(selection);
            self.pending_panel_open = true;
            return;
        }

        let current = self.state.current_style_set();
        if !current.is_empty() {
            if let Some(block) = self.state.block(&selection.block_key) {
                let range = styled_range(block, &current);
                if !range.is_empty() {
                    self.state = self.state.apply_inline_style(&range, StyleTag::Command);
                    self.state = self.state.set_selection(range);
                    self.pending_panel_open = true;
                    return;
                }
            }
        }

        self.mode = CommandMode::Panel(PanelController::new(self.altering.prompt_char()));
    }
}
