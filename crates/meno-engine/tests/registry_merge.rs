use std::sync::Arc;

use futures::executor::block_on;
use meno_core::EditorState;
use meno_engine::{
    CmdDescriptor, CmdInvocation, CmdRegistry, CmdRegistryPatch, EditorTriggers,
    default_editing_registry,
};

fn dummy_invocation() -> CmdInvocation {
    let state = EditorState::empty();
    let range = state.selection().clone();
    CmdInvocation {
        state,
        range,
        argument: None,
        triggers: Arc::new(EditorTriggers::new()),
        inline_argument: None,
    }
}

#[test]
fn no_patch_keeps_the_defaults() {
    let merged = CmdRegistry::merged(default_editing_registry(), None);
    assert_eq!(merged.prompt_char(), '$');
    assert!(merged.contains("i"));
    assert!(merged.contains("h"));
}

#[test]
fn patch_overwrites_the_prompt_char() {
    let patch = CmdRegistryPatch::new().prompt_char('!');
    let merged = CmdRegistry::merged(default_editing_registry(), Some(patch));
    assert_eq!(merged.prompt_char(), '!');
    // Commands are untouched.
    assert!(merged.contains("i"));
}

#[test]
fn patch_commands_merge_key_by_key() {
    let patch = CmdRegistryPatch::new().command(
        "up",
        CmdDescriptor::sync(|invocation| Ok(Some(invocation.state))),
    );
    let merged = CmdRegistry::merged(default_editing_registry(), Some(patch));

    assert!(merged.contains("up"));
    assert!(merged.contains("i"));
    assert!(merged.contains("h"));
}

#[test]
fn patch_entries_win_over_defaults() {
    // Default `i` rejects a missing argument; the override accepts it.
    let patch = CmdRegistryPatch::new().command(
        "i",
        CmdDescriptor::sync(|invocation| Ok(Some(invocation.state))),
    );
    let merged = CmdRegistry::merged(default_editing_registry(), Some(patch));

    let descriptor = merged.descriptor("i").unwrap();
    let result = block_on(descriptor.invoke(dummy_invocation()));
    assert!(result.unwrap().is_some());
}

#[test]
fn async_descriptors_invoke_like_sync_ones() {
    let descriptor = CmdDescriptor::async_fn(|invocation| async move { Ok(Some(invocation.state)) });
    assert!(descriptor.is_async());

    let result = block_on(descriptor.invoke(dummy_invocation()));
    assert!(result.unwrap().is_some());
}
