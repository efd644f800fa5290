use serde::{Deserialize, Serialize};

use crate::content::{BlockKey, BlockType, ContentBlock, ContentState, floor_char_boundary};
use crate::raw::RawContent;
use crate::style::{StyleSet, StyleTag};

/// A range of character offsets within one block.
///
/// `anchor_offset <= focus_offset` is not required by construction;
/// callers that need the ordered bounds use [`SelectionRange::start`]
/// and [`SelectionRange::end`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub block_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_offset: usize,
    pub has_focus: bool,
}

impl SelectionRange {
    pub fn new(block_key: BlockKey, anchor_offset: usize, focus_offset: usize) -> Self {
        Self {
            block_key,
            anchor_offset,
            focus_offset,
            has_focus: true,
        }
    }

    pub fn collapsed(block_key: BlockKey, offset: usize) -> Self {
        Self::new(block_key, offset, offset)
    }

    /// The "no match" range: anchor == focus == 0, unfocused.
    pub fn empty(block_key: BlockKey) -> Self {
        Self {
            block_key,
            anchor_offset: 0,
            focus_offset: 0,
            has_focus: false,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_offset == self.focus_offset
    }

    pub fn start(&self) -> usize {
        self.anchor_offset.min(self.focus_offset)
    }

    pub fn end(&self) -> usize {
        self.anchor_offset.max(self.focus_offset)
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

/// Version token of an [`EditorState`] snapshot. Strictly increases
/// with every state transition, so a result computed against an older
/// snapshot can be recognized and discarded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Immutable snapshot of the editable content plus the active
/// selection. Every operation returns a fresh value; nothing mutates a
/// snapshot in place.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    content: ContentState,
    selection: SelectionRange,
    style_override: Option<StyleSet>,
    generation: Generation,
}

impl EditorState {
    pub fn empty() -> Self {
        let content = ContentState::empty();
        let selection = SelectionRange::collapsed(content.first_block().key.clone(), 0);
        Self {
            content,
            selection,
            style_override: None,
            generation: Generation::default(),
        }
    }

    pub fn from_raw(raw: &RawContent) -> Self {
        let content = raw.to_content();
        let selection = SelectionRange::collapsed(content.first_block().key.clone(), 0);
        Self {
            content,
            selection,
            style_override: None,
            generation: Generation::default(),
        }
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn selection(&self) -> &SelectionRange {
        &self.selection
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn block(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.content.block_for_key(key)
    }

    /// The style set active at the caret.
    ///
    /// A pending toggle override wins; otherwise a collapsed caret
    /// reports the style of the character before it, and a non-collapsed
    /// selection reports the style at its start.
    pub fn current_style_set(&self) -> StyleSet {
        if let Some(styles) = &self.style_override {
            return styles.clone();
        }
        let Some(block) = self.content.block_for_key(&self.selection.block_key) else {
            return StyleSet::new();
        };
        if block.text_len() == 0 {
            return StyleSet::new();
        }
        let probe = if self.selection.is_collapsed() {
            self.selection.start().saturating_sub(1)
        } else {
            self.selection.start()
        };
        block.style_at(probe)
    }

    pub fn to_raw(&self) -> RawContent {
        RawContent::from_content(&self.content)
    }

    /// Replace the text in `range` with `text`, carrying `styles` (an
    /// empty set yields plain text). The caret lands after the
    /// replacement.
    pub fn replace_text(&self, range: &SelectionRange, text: &str, styles: StyleSet) -> Self {
        let mut content = self.content.clone();
        let Some(block) = content.block_for_key_mut(&range.block_key) else {
            return self.clone();
        };

        let start = floor_char_boundary(&block.text, range.start());
        let end = floor_char_boundary(&block.text, range.end()).max(start);

        block.text.replace_range(start..end, text);
        block.styles.delete_range(start..end);
        block.styles.insert_range(start, text.len(), styles);

        let selection = SelectionRange::collapsed(range.block_key.clone(), start + text.len());
        self.advance(content, selection, None)
    }

    /// Insert `text` at the start of `range` without removing anything.
    pub fn insert_text(&self, range: &SelectionRange, text: &str, styles: StyleSet) -> Self {
        let mut content = self.content.clone();
        let Some(block) = content.block_for_key_mut(&range.block_key) else {
            return self.clone();
        };

        let at = floor_char_boundary(&block.text, range.start());
        block.text.insert_str(at, text);
        block.styles.insert_range(at, text.len(), styles);

        let selection = SelectionRange::collapsed(range.block_key.clone(), at + text.len());
        self.advance(content, selection, None)
    }

    pub fn apply_inline_style(&self, range: &SelectionRange, tag: StyleTag) -> Self {
        self.update_styles(range, |set| {
            set.insert(tag);
        })
    }

    pub fn remove_inline_style(&self, range: &SelectionRange, tag: StyleTag) -> Self {
        self.update_styles(range, |set| {
            set.remove(tag);
        })
    }

    /// Toggle `tag` the way a caret-level style shortcut does: a
    /// collapsed selection flips the pending override so upcoming text
    /// picks it up, a non-collapsed one restyles the range itself.
    pub fn toggle_inline_style(&self, tag: StyleTag) -> Self {
        if self.selection.is_collapsed() {
            let mut styles = self.current_style_set();
            styles.toggle(tag);
            let mut next = self.clone();
            next.style_override = Some(styles);
            next.generation = self.generation.next();
            return next;
        }

        let everywhere = self
            .content
            .block_for_key(&self.selection.block_key)
            .map(|block| {
                block
                    .styles
                    .iter_runs_in_range(self.selection.start()..self.selection.end())
                    .all(|(_, styles)| styles.contains(tag))
            })
            .unwrap_or(false);

        let range = self.selection.clone();
        if everywhere {
            self.remove_inline_style(&range, tag)
        } else {
            self.apply_inline_style(&range, tag)
        }
    }

    pub fn set_block_type(&self, range: &SelectionRange, block_type: BlockType) -> Self {
        let mut content = self.content.clone();
        let Some(block) = content.block_for_key_mut(&range.block_key) else {
            return self.clone();
        };
        block.block_type = block_type;
        let selection = self.selection.clone();
        self.advance(content, selection, self.style_override.clone())
    }

    pub fn set_selection(&self, selection: SelectionRange) -> Self {
        self.advance(self.content.clone(), selection, None)
    }

    /// Reset to a single empty block, keeping the generation moving
    /// forward so stale results from before the reset stay stale.
    pub fn cleared(&self) -> Self {
        let content = ContentState::empty();
        let selection = SelectionRange::collapsed(content.first_block().key.clone(), 0);
        self.advance(content, selection, None)
    }

    fn update_styles(&self, range: &SelectionRange, update: impl FnMut(&mut StyleSet)) -> Self {
        let mut content = self.content.clone();
        let Some(block) = content.block_for_key_mut(&range.block_key) else {
            return self.clone();
        };
        block.styles.update_range(range.start()..range.end(), update);
        let selection = self.selection.clone();
        self.advance(content, selection, None)
    }

    fn advance(
        &self,
        content: ContentState,
        selection: SelectionRange,
        style_override: Option<StyleSet>,
    ) -> Self {
        Self {
            content,
            selection,
            style_override,
            generation: self.generation.next(),
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::empty()
    }
}
