use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use meno_core::{EditorState, RawContent, SelectionRange};

use crate::error::CmdError;

/// Persistence hook supplied by the host application. Receives the
/// serialized document; a rejected future surfaces through the normal
/// dispatch error path.
pub type SaveFn = Arc<dyn Fn(RawContent) -> BoxFuture<'static, Result<(), CmdError>> + Send + Sync>;

/// Side-effect hooks the host wires into command handlers.
#[derive(Clone, Default)]
pub struct EditorTriggers {
    pub on_save: Option<SaveFn>,
}

impl EditorTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_save<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(RawContent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CmdError>> + Send + 'static,
    {
        self.on_save = Some(Arc::new(move |raw| f(raw).boxed()));
        self
    }
}

impl fmt::Debug for EditorTriggers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorTriggers")
            .field("on_save", &self.on_save.is_some())
            .finish()
    }
}

/// The normalized argument bundle every handler receives, identical
/// for synchronous and asynchronous commands.
#[derive(Debug, Clone)]
pub struct CmdInvocation {
    /// Snapshot the command was captured against.
    pub state: EditorState,
    /// The command range (editing) or ambient range (altering).
    pub range: SelectionRange,
    /// Text after the first `:`, if any.
    pub argument: Option<String>,
    pub triggers: Arc<EditorTriggers>,
    /// Literal text inside the ambient range; altering path only.
    pub inline_argument: Option<String>,
}
