use std::collections::BTreeSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Inline style markers attached to text runs.
///
/// `Command` is transient: it tags the span currently being typed as a
/// command so the engine can recognize "composing a command" without
/// separate bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTag {
    Command,
    Bold,
    Italic,
    Underline,
    Important,
}

/// An ordered set of [`StyleTag`]s carried by a run of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSet(BTreeSet<StyleTag>);

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(tag: StyleTag) -> Self {
        let mut set = Self::default();
        set.insert(tag);
        set
    }

    pub fn with(mut self, tag: StyleTag) -> Self {
        self.insert(tag);
        self
    }

    pub fn insert(&mut self, tag: StyleTag) -> bool {
        self.0.insert(tag)
    }

    pub fn remove(&mut self, tag: StyleTag) -> bool {
        self.0.remove(&tag)
    }

    pub fn toggle(&mut self, tag: StyleTag) {
        if !self.0.remove(&tag) {
            self.0.insert(tag);
        }
    }

    pub fn contains(&self, tag: StyleTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_superset(&self, other: &StyleSet) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = StyleTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<StyleTag> for StyleSet {
    fn from_iter<I: IntoIterator<Item = StyleTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRun {
    pub len: usize,
    pub styles: StyleSet,
}

/// Run-length encoding of the per-character style sets of one block.
///
/// Invariant: the sum of run lengths equals the block's text length.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRuns {
    runs: Vec<StyleRun>,
}

impl StyleRuns {
    pub fn new(total_len: usize) -> Self {
        Self {
            runs: vec![StyleRun {
                len: total_len,
                styles: StyleSet::default(),
            }],
        }
    }

    pub fn total_len(&self) -> usize {
        self.runs.iter().map(|r| r.len).sum()
    }

    pub fn style_at(&self, mut offset: usize) -> StyleSet {
        let total_len = self.total_len();
        if total_len == 0 {
            return StyleSet::default();
        }
        if offset >= total_len {
            offset = total_len.saturating_sub(1);
        }

        let mut cursor = 0;
        for run in &self.runs {
            if offset < cursor + run.len {
                return run.styles.clone();
            }
            cursor += run.len;
        }

        self.runs
            .last()
            .map(|r| r.styles.clone())
            .unwrap_or_default()
    }

    pub fn delete_range(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }

        let start_ix = self.split_at(range.start);
        let end_ix = self.split_at(range.end);
        if start_ix < end_ix {
            self.runs.drain(start_ix..end_ix);
        }
        self.normalize();
    }

    pub fn insert_range(&mut self, offset: usize, len: usize, styles: StyleSet) {
        if len == 0 {
            return;
        }
        let ix = self.split_at(offset);
        self.runs.insert(ix, StyleRun { len, styles });
        self.normalize();
    }

    pub fn update_range(&mut self, range: Range<usize>, mut update: impl FnMut(&mut StyleSet)) {
        if range.is_empty() {
            return;
        }
        let start_ix = self.split_at(range.start);
        let end_ix = self.split_at(range.end);
        for run in &mut self.runs[start_ix..end_ix] {
            update(&mut run.styles);
        }
        self.normalize();
    }

    pub fn iter_runs_in_range(
        &self,
        range: Range<usize>,
    ) -> impl Iterator<Item = (Range<usize>, &StyleSet)> {
        let mut cursor = 0usize;
        self.runs.iter().filter_map(move |run| {
            let run_start = cursor;
            let run_end = cursor + run.len;
            cursor = run_end;

            let start = run_start.max(range.start);
            let end = run_end.min(range.end);
            if start < end {
                Some((start..end, &run.styles))
            } else {
                None
            }
        })
    }

    pub fn iter_runs(&self) -> impl Iterator<Item = (Range<usize>, &StyleSet)> {
        self.iter_runs_in_range(0..self.total_len())
    }

    fn split_at(&mut self, offset: usize) -> usize {
        let total_len = self.total_len();
        let offset = offset.min(total_len);

        let mut cursor = 0usize;
        for ix in 0..self.runs.len() {
            let run_len = self.runs[ix].len;
            if offset == cursor {
                return ix;
            }
            if offset < cursor + run_len {
                let left_len = offset - cursor;
                let right_len = run_len - left_len;
                let styles = self.runs[ix].styles.clone();
                self.runs[ix].len = left_len;
                self.runs.insert(
                    ix + 1,
                    StyleRun {
                        len: right_len,
                        styles,
                    },
                );
                return ix + 1;
            }
            cursor += run_len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        let keep_zero = self.runs.len() == 1;
        self.runs.retain(|r| r.len > 0 || keep_zero);

        if self.runs.is_empty() {
            self.runs.push(StyleRun {
                len: 0,
                styles: StyleSet::default(),
            });
            return;
        }

        let mut merged: Vec<StyleRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if let Some(prev) = merged.last_mut() {
                if prev.styles == run.styles {
                    prev.len += run.len;
                    continue;
                }
            }
            merged.push(run);
        }

        self.runs = merged;
        if self.runs.is_empty() {
            self.runs.push(StyleRun {
                len: 0,
                styles: StyleSet::default(),
            });
        }
    }
}
