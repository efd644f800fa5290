use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::style::{StyleRuns, StyleSet};

static NEXT_BLOCK_KEY: AtomicU64 = AtomicU64::new(0);

/// Largest char boundary at or below `offset`, clamped to the text
/// length. Selection offsets come from the host and may land inside a
/// multi-byte character.
pub(crate) fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut ix = offset.min(text.len());
    while !text.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

/// Opaque identifier of a content block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn fresh() -> Self {
        let n = NEXT_BLOCK_KEY.fetch_add(1, Ordering::Relaxed);
        Self(format!("b{n}"))
    }

    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Structural type of a block, in the raw format's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    UnorderedListItem,
    OrderedListItem,
    Blockquote,
    CodeBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub key: BlockKey,
    pub block_type: BlockType,
    pub(crate) text: String,
    pub(crate) styles: StyleRuns,
}

impl ContentBlock {
    pub fn from_text(key: BlockKey, text: &str) -> Self {
        Self {
            key,
            block_type: BlockType::Unstyled,
            text: text.to_string(),
            styles: StyleRuns::new(text.len()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Literal text inside `range`, clamped to the block bounds and to
    /// char boundaries.
    pub fn text_in(&self, range: Range<usize>) -> &str {
        let start = floor_char_boundary(&self.text, range.start);
        let end = floor_char_boundary(&self.text, range.end).max(start);
        &self.text[start..end]
    }

    pub fn styles(&self) -> &StyleRuns {
        &self.styles
    }

    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.styles.style_at(offset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentState {
    pub blocks: Vec<ContentBlock>,
}

impl Default for ContentState {
    fn default() -> Self {
        Self::empty()
    }
}

impl ContentState {
    /// A document with a single empty unstyled block.
    pub fn empty() -> Self {
        Self {
            blocks: vec![ContentBlock::from_text(BlockKey::fresh(), "")],
        }
    }

    pub fn block_for_key(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| &b.key == key)
    }

    pub(crate) fn block_for_key_mut(&mut self, key: &BlockKey) -> Option<&mut ContentBlock> {
        self.blocks.iter_mut().find(|b| &b.key == key)
    }

    pub fn first_block(&self) -> &ContentBlock {
        &self.blocks[0]
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for (ix, block) in self.blocks.iter().enumerate() {
            if ix > 0 {
                out.push('\n');
            }
            out.push_str(&block.text);
        }
        out
    }
}
