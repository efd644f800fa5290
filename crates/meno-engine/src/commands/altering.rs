//! Default altering (panel) commands: entered through the modal input
//! as `name` or `name:argument`, operating on the ambient selection.

use meno_core::{BlockType, StyleSet, StyleTag};

use crate::error::CmdError;
use crate::invocation::CmdInvocation;
use crate::registry::{CmdDescriptor, CmdRegistry, CmdResult};

pub const DEFAULT_ALTERING_PROMPT: char = '#';

/// The fixed name the host-facing `save()` hook resolves.
pub const SAVE_CMD: &str = "w";

pub fn default_altering_registry() -> CmdRegistry {
    let mut registry = CmdRegistry::new(DEFAULT_ALTERING_PROMPT);
    registry.register(SAVE_CMD, CmdDescriptor::async_fn(write_file));
    registry.register("cb", CmdDescriptor::sync(change_block_type));
    registry.register("h", CmdDescriptor::sync(toggle_highlight));
    registry
}

async fn write_file(invocation: CmdInvocation) -> CmdResult {
    let Some(on_save) = invocation.triggers.on_save.clone() else {
        return Err(CmdError::new("w: onSave is not defined."));
    };
    on_save(invocation.state.to_raw()).await?;
    // Side-effect-only success: the document itself is unchanged.
    Ok(Some(invocation.state))
}

fn change_block_type(invocation: CmdInvocation) -> CmdResult {
    let arg = invocation.argument.as_deref().unwrap_or("");
    let block_type = match arg {
        "p" => BlockType::Unstyled,
        "h1" => BlockType::HeaderOne,
        "h2" => BlockType::HeaderTwo,
        "h3" => BlockType::HeaderThree,
        "h4" => BlockType::HeaderFour,
        "h5" => BlockType::HeaderFive,
        "h6" => BlockType::HeaderSix,
        "ul" => BlockType::UnorderedListItem,
        "ol" => BlockType::OrderedListItem,
        "q" => BlockType::Blockquote,
        "c" => BlockType::CodeBlock,
        _ => return Err(CmdError::new(format!("cb: {arg} block doesn't exist."))),
    };
    Ok(Some(
        invocation
            .state
            .set_block_type(&invocation.range, block_type),
    ))
}

fn toggle_highlight(invocation: CmdInvocation) -> CmdResult {
    let inline_arg = invocation.inline_argument.clone().unwrap_or_default();
    Ok(Some(invocation.state.replace_text(
        &invocation.range,
        &inline_arg,
        StyleSet::of(StyleTag::Important),
    )))
}
