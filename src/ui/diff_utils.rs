use ratatui::{style::Color, text::Span};
use similar::{Algorithm, ChangeTag, TextDiff};
use std::ops::Range;

use crate::diff_file::{DiffLine, LineType};

/// Computes the ranges of changes within a line.
/// Returns a tuple of (ranges in old text, ranges in new text) that differ.
pub fn compute_intra_line_diff(
    old_text: &str,
    new_text: &str,
) -> (Vec<Range<usize>>, Vec<Range<usize>>) {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(old_text, new_text);

    let mut old_ranges: Vec<Range<usize>> = Vec::new();
    let mut new_ranges: Vec<Range<usize>> = Vec::new();
    let mut old_idx = 0;
    let mut new_idx = 0;

    for change in diff.iter_all_changes() {
        let len = change.value().len();
        match change.tag() {
            ChangeTag::Equal => {
                old_idx += len;
                new_idx += len;
            }
            ChangeTag::Delete => {
                push_merged(&mut old_ranges, old_idx..old_idx + len);
                old_idx += len;
            }
            ChangeTag::Insert => {
                push_merged(&mut new_ranges, new_idx..new_idx + len);
                new_idx += len;
            }
        }
    }

    (old_ranges, new_ranges)
}

fn push_merged(ranges: &mut Vec<Range<usize>>, range: Range<usize>) {
    match ranges.last_mut() {
        Some(last) if last.end == range.start => last.end = range.end,
        _ => ranges.push(range),
    }
}

/// For every line, the index of the line it should be compared with
/// character by character.
///
/// A run of deletions directly followed by a run of additions is paired in
/// order: the k-th deleted line with the k-th added line. Surplus lines on
/// either side, and common lines, have no partner.
pub fn pair_changed_lines(lines: &[DiffLine]) -> Vec<Option<usize>> {
    let mut partners = vec![None; lines.len()];
    let mut i = 0;

    while i < lines.len() {
        if lines[i].line_type != LineType::Deleted {
            i += 1;
            continue;
        }

        let deleted = run_length(lines, i, LineType::Deleted);
        let added = run_length(lines, i + deleted, LineType::Added);
        for k in 0..deleted.min(added) {
            partners[i + k] = Some(i + deleted + k);
            partners[i + deleted + k] = Some(i + k);
        }
        i += deleted + added;
    }

    partners
}

fn run_length(lines: &[DiffLine], start: usize, line_type: LineType) -> usize {
    lines[start..]
        .iter()
        .take_while(|line| line.line_type == line_type)
        .count()
}

/// One row of the side-by-side view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideBySideRow<'a> {
    pub old: Option<&'a DiffLine>,
    pub new: Option<&'a DiffLine>,
}

/// Lays the unified sequence out as rows, putting paired deletions and
/// additions next to each other.
pub fn side_by_side_rows(lines: &[DiffLine]) -> Vec<SideBySideRow<'_>> {
    let mut rows = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        match lines[i].line_type {
            LineType::Common => {
                rows.push(SideBySideRow {
                    old: Some(&lines[i]),
                    new: Some(&lines[i]),
                });
                i += 1;
            }
            LineType::Deleted => {
                let deleted = run_length(lines, i, LineType::Deleted);
                let added = run_length(lines, i + deleted, LineType::Added);
                for k in 0..deleted.max(added) {
                    rows.push(SideBySideRow {
                        old: (k < deleted).then(|| &lines[i + k]),
                        new: (k < added).then(|| &lines[i + deleted + k]),
                    });
                }
                i += deleted + added;
            }
            LineType::Added => {
                rows.push(SideBySideRow {
                    old: None,
                    new: Some(&lines[i]),
                });
                i += 1;
            }
        }
    }

    rows
}

/// Applies diff highlighting to existing syntax highlighted spans.
///
/// * `spans` - The original syntax highlighted spans
/// * `diff_ranges` - The ranges that should be highlighted with the diff color
/// * `base_bg` - The background color for the whole line (e.g. dark red for deleted)
/// * `highlight_bg` - The background color for the changed parts (e.g. bright red)
pub fn apply_diff_highlight<'a>(
    spans: Vec<Span<'a>>,
    diff_ranges: &[Range<usize>],
    base_bg: Color,
    highlight_bg: Color,
) -> Vec<Span<'a>> {
    if diff_ranges.is_empty() {
        return spans
            .into_iter()
            .map(|span| {
                let style = span.style.bg(base_bg);
                Span::styled(span.content, style)
            })
            .collect();
    }

    let mut new_spans = Vec::new();
    let mut current_idx = 0;

    for span in spans {
        let content = span.content;
        let len = content.len();
        let span_end = current_idx + len;
        let style = span.style;

        let mut last_processed = current_idx;

        for range in diff_ranges {
            if range.end <= current_idx {
                continue;
            }
            if range.start >= span_end {
                break;
            }

            let overlap_start = range.start.max(current_idx);
            let overlap_end = range.end.min(span_end);

            if overlap_start > last_processed {
                let sub_content =
                    &content[(last_processed - current_idx)..(overlap_start - current_idx)];
                new_spans.push(Span::styled(sub_content.to_string(), style.bg(base_bg)));
            }

            let sub_content = &content[(overlap_start - current_idx)..(overlap_end - current_idx)];
            new_spans.push(Span::styled(sub_content.to_string(), style.bg(highlight_bg)));

            last_processed = overlap_end;
        }

        if last_processed < span_end {
            let sub_content = &content[(last_processed - current_idx)..];
            new_spans.push(Span::styled(sub_content.to_string(), style.bg(base_bg)));
        }

        current_idx += len;
    }

    new_spans
}
