use meno_core::{ContentBlock, SelectionRange, StyleSet};

/// Find the maximal contiguous run of `block` whose style set covers
/// every tag in `required`, widening across all qualifying spans.
///
/// Disjoint qualifying spans fold into the union of their extents.
/// No qualifying span yields [`SelectionRange::empty`] (anchor ==
/// focus == 0) rather than a failure; callers check emptiness
/// explicitly. Pure read of the block.
pub fn styled_range(block: &ContentBlock, required: &StyleSet) -> SelectionRange {
    let mut range = SelectionRange::empty(block.key.clone());
    let mut found = false;

    for (span, styles) in block.styles().iter_runs() {
        if span.is_empty() || !styles.is_superset(required) {
            continue;
        }
        if found {
            range.anchor_offset = range.anchor_offset.min(span.start);
            range.focus_offset = range.focus_offset.max(span.end);
        } else {
            range.anchor_offset = span.start;
            range.focus_offset = span.end;
            range.has_focus = true;
            found = true;
        }
    }

    range
}
