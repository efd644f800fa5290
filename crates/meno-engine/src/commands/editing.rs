//! Default editing (inline) commands: typed into the document body as
//! `$name:argument`, operating on the command range itself.

use meno_core::{StyleSet, StyleTag};

use crate::error::CmdError;
use crate::invocation::CmdInvocation;
use crate::registry::{CmdDescriptor, CmdRegistry, CmdResult};

pub const DEFAULT_EDITING_PROMPT: char = '$';

pub fn default_editing_registry() -> CmdRegistry {
    let mut registry = CmdRegistry::new(DEFAULT_EDITING_PROMPT);
    registry.register("i", CmdDescriptor::sync(toggle_italic));
    registry.register("h", CmdDescriptor::sync(toggle_important));
    registry
}

fn toggle_italic(invocation: CmdInvocation) -> CmdResult {
    let Some(arg) = required_argument(&invocation) else {
        return Err(CmdError::new("i: italic command need an argument"));
    };
    Ok(Some(invocation.state.replace_text(
        &invocation.range,
        &arg,
        StyleSet::of(StyleTag::Italic),
    )))
}

fn toggle_important(invocation: CmdInvocation) -> CmdResult {
    let Some(arg) = required_argument(&invocation) else {
        return Err(CmdError::new("h: important command need an argument"));
    };
    Ok(Some(invocation.state.replace_text(
        &invocation.range,
        &arg,
        StyleSet::of(StyleTag::Important),
    )))
}

fn required_argument(invocation: &CmdInvocation) -> Option<String> {
    invocation
        .argument
        .as_deref()
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
}
