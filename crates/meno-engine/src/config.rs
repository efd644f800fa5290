use meno_core::RawContent;

use crate::dispatch::ErrorReporter;
use crate::invocation::EditorTriggers;
use crate::registry::CmdRegistryPatch;

/// Host-supplied configuration. Registry patches are merged over the
/// defaults once, when the engine is constructed.
#[derive(Clone, Default)]
pub struct EngineConfig {
    pub initial_content: Option<RawContent>,
    pub editing: Option<CmdRegistryPatch>,
    pub altering: Option<CmdRegistryPatch>,
    pub triggers: EditorTriggers,
    pub reporter: Option<ErrorReporter>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_content(mut self, raw: RawContent) -> Self {
        self.initial_content = Some(raw);
        self
    }

    pub fn editing(mut self, patch: CmdRegistryPatch) -> Self {
        self.editing = Some(patch);
        self
    }

    pub fn altering(mut self, patch: CmdRegistryPatch) -> Self {
        self.altering = Some(patch);
        self
    }

    pub fn triggers(mut self, triggers: EditorTriggers) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn reporter(mut self, reporter: ErrorReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }
}
