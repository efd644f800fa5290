use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use meno_core::EditorState;

use crate::error::CmdError;
use crate::invocation::CmdInvocation;

/// Handler output: `Ok(Some)` is a result state to apply (possibly the
/// unchanged input for side-effect-only commands), `Ok(None)` is an
/// explicit "nothing to apply" which the dispatcher treats as a logic
/// failure, `Err` is a handler-raised failure.
pub type CmdResult = Result<Option<EditorState>, CmdError>;

pub type SyncHandler = Arc<dyn Fn(CmdInvocation) -> CmdResult + Send + Sync>;
pub type AsyncHandler =
    Arc<dyn Fn(CmdInvocation) -> BoxFuture<'static, CmdResult> + Send + Sync>;

#[derive(Clone)]
pub enum CmdExec {
    Sync(SyncHandler),
    Async(AsyncHandler),
}

/// The registered callable a command name resolves to.
#[derive(Clone)]
pub struct CmdDescriptor {
    exec: CmdExec,
}

impl CmdDescriptor {
    pub fn sync(handler: impl Fn(CmdInvocation) -> CmdResult + Send + Sync + 'static) -> Self {
        Self {
            exec: CmdExec::Sync(Arc::new(handler)),
        }
    }

    pub fn async_fn<F, Fut>(handler: F) -> Self
    where
        F: Fn(CmdInvocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CmdResult> + Send + 'static,
    {
        Self {
            exec: CmdExec::Async(Arc::new(move |invocation| handler(invocation).boxed())),
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self.exec, CmdExec::Async(_))
    }

    /// Run the handler, awaiting uniformly regardless of whether the
    /// underlying work is immediate or deferred.
    pub async fn invoke(&self, invocation: CmdInvocation) -> CmdResult {
        match &self.exec {
            CmdExec::Sync(handler) => handler(invocation),
            CmdExec::Async(handler) => handler(invocation).await,
        }
    }
}

/// A prompt character plus the command names it can introduce.
/// Immutable once the engine is constructed.
#[derive(Clone)]
pub struct CmdRegistry {
    prompt_char: char,
    cmds: HashMap<String, CmdDescriptor>,
}

impl CmdRegistry {
    pub fn new(prompt_char: char) -> Self {
        Self {
            prompt_char,
            cmds: HashMap::new(),
        }
    }

    pub fn prompt_char(&self) -> char {
        self.prompt_char
    }

    /// Last registration wins.
    pub fn register(&mut self, name: impl Into<String>, descriptor: CmdDescriptor) {
        self.cmds.insert(name.into(), descriptor);
    }

    pub fn descriptor(&self, name: &str) -> Option<&CmdDescriptor> {
        self.cmds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cmds.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cmds.keys().map(String::as_str)
    }

    /// Overlay a user patch on a default registry: `prompt_char` is
    /// overwritten field-wise, `cmds` merged key-by-key with user
    /// entries winning and untouched defaults surviving.
    pub fn merged(mut defaults: CmdRegistry, patch: Option<CmdRegistryPatch>) -> CmdRegistry {
        let Some(patch) = patch else {
            return defaults;
        };
        if let Some(prompt_char) = patch.prompt_char {
            defaults.prompt_char = prompt_char;
        }
        for (name, descriptor) in patch.cmds {
            defaults.cmds.insert(name, descriptor);
        }
        defaults
    }
}

/// Partial registry supplied by the host at configuration time.
#[derive(Clone, Default)]
pub struct CmdRegistryPatch {
    pub prompt_char: Option<char>,
    pub cmds: HashMap<String, CmdDescriptor>,
}

impl CmdRegistryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt_char(mut self, prompt_char: char) -> Self {
        self.prompt_char = Some(prompt_char);
        self
    }

    pub fn command(mut self, name: impl Into<String>, descriptor: CmdDescriptor) -> Self {
        self.cmds.insert(name.into(), descriptor);
        self
    }
}
