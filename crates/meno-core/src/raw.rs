use serde::{Deserialize, Serialize};

use crate::content::{BlockKey, BlockType, ContentBlock, ContentState};
use crate::style::{StyleRuns, StyleTag};

/// The raw interchange shape for persisted documents: a flat list of
/// blocks with per-style offset ranges, plus an opaque entity map kept
/// for round-tripping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
    #[serde(default, rename = "entityMap")]
    pub entity_map: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub block_type: BlockType,
    #[serde(default, rename = "inlineStyleRanges")]
    pub inline_style_ranges: Vec<RawStyleRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: StyleTag,
}

impl RawContent {
    pub fn from_content(content: &ContentState) -> Self {
        Self {
            blocks: content.blocks.iter().map(block_to_raw).collect(),
            entity_map: serde_json::Map::new(),
        }
    }

    pub fn to_content(&self) -> ContentState {
        if self.blocks.is_empty() {
            return ContentState::empty();
        }
        ContentState {
            blocks: self.blocks.iter().map(raw_to_block).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

fn block_to_raw(block: &ContentBlock) -> RawBlock {
    let mut ranges: Vec<RawStyleRange> = Vec::new();

    for (span, styles) in block.styles().iter_runs() {
        for tag in styles.iter() {
            if let Some(prev) = ranges
                .iter_mut()
                .find(|r| r.style == tag && r.offset + r.length == span.start)
            {
                prev.length = span.end - prev.offset;
            } else {
                ranges.push(RawStyleRange {
                    offset: span.start,
                    length: span.end - span.start,
                    style: tag,
                });
            }
        }
    }

    RawBlock {
        key: block.key.as_str().to_string(),
        text: block.text().to_string(),
        block_type: block.block_type,
        inline_style_ranges: ranges,
    }
}

fn raw_to_block(raw: &RawBlock) -> ContentBlock {
    let key = if raw.key.is_empty() {
        BlockKey::fresh()
    } else {
        BlockKey::from_raw(raw.key.clone())
    };

    let mut styles = StyleRuns::new(raw.text.len());
    for range in &raw.inline_style_ranges {
        let start = range.offset.min(raw.text.len());
        let end = (range.offset + range.length).min(raw.text.len());
        styles.update_range(start..end, |set| {
            set.insert(range.style);
        });
    }

    ContentBlock {
        key,
        block_type: raw.block_type,
        text: raw.text.clone(),
        styles,
    }
}
