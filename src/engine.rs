//! Line-level diffing.
//!
//! The alignment comes from a longest-common-subsequence table over whole
//! lines. Where two alignments are equally short the walk consumes the old
//! line first, so a given pair of inputs always produces the same output.

use tracing::debug;

use crate::diff_file::{DiffLine, DiffResult};
use crate::document::split_lines;

/// Stateless handle over [`diff`] for callers that want an engine value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineDiffEngine;

impl LineDiffEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn diff(&self, old_text: &str, new_text: &str) -> DiffResult {
        diff(old_text, new_text)
    }
}

/// Suffix LCS lengths: `get(i, j)` is the LCS length of `old[i..]` and `new[j..]`.
#[derive(Debug, Clone)]
pub struct LcsTable {
    cells: Vec<usize>,
    width: usize,
}

impl LcsTable {
    pub fn build(old: &[&str], new: &[&str]) -> Self {
        let width = new.len() + 1;
        let mut cells = vec![0; (old.len() + 1) * width];

        for i in (0..old.len()).rev() {
            for j in (0..new.len()).rev() {
                cells[i * width + j] = if old[i] == new[j] {
                    cells[(i + 1) * width + j + 1] + 1
                } else {
                    cells[(i + 1) * width + j].max(cells[i * width + j + 1])
                };
            }
        }

        Self { cells, width }
    }

    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.width + j]
    }

    pub fn lcs_len(&self) -> usize {
        self.cells[0]
    }
}

/// Aligns `old_text` against `new_text` line by line.
///
/// An empty `old_text` means there is no baseline: every line of `new_text`
/// is reported as added without consulting the table.
pub fn diff(old_text: &str, new_text: &str) -> DiffResult {
    let new_lines = split_lines(new_text);

    if old_text.is_empty() {
        debug!(new_lines = new_lines.len(), "empty baseline, all lines added");
        return DiffResult::from_lines(
            new_lines
                .iter()
                .enumerate()
                .map(|(idx, line)| DiffLine::new_added(line, idx + 1))
                .collect(),
        );
    }

    let old_lines = split_lines(old_text);
    debug!(
        old_lines = old_lines.len(),
        new_lines = new_lines.len(),
        "computing lcs alignment"
    );

    let table = LcsTable::build(&old_lines, &new_lines);
    DiffResult::from_lines(walk(&old_lines, &new_lines, &table))
}

fn walk(old: &[&str], new: &[&str], table: &LcsTable) -> Vec<DiffLine> {
    let mut lines = Vec::with_capacity(old.len() + new.len() - table.lcs_len());
    let (mut i, mut j) = (0, 0);
    let mut old_line_num = 1;
    let mut new_line_num = 1;

    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            lines.push(DiffLine::new_common(old[i], old_line_num, new_line_num));
            old_line_num += 1;
            new_line_num += 1;
            i += 1;
            j += 1;
        } else if table.get(i + 1, j) >= table.get(i, j + 1) {
            lines.push(DiffLine::new_deleted(old[i], old_line_num));
            old_line_num += 1;
            i += 1;
        } else {
            lines.push(DiffLine::new_added(new[j], new_line_num));
            new_line_num += 1;
            j += 1;
        }
    }

    for line in &old[i..] {
        lines.push(DiffLine::new_deleted(line, old_line_num));
        old_line_num += 1;
    }
    for line in &new[j..] {
        lines.push(DiffLine::new_added(line, new_line_num));
        new_line_num += 1;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_file::LineType;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;

    #[fixture]
    fn file_inputs() -> (&'static str, &'static str) {
        ("line1\nline2\nline3\nline4", "line2\nline3_modified\nline4\nline5")
    }

    #[rstest]
    fn test_diff_files(file_inputs: (&'static str, &'static str)) {
        let (old, new) = file_inputs;
        let result = diff(old, new);
        let expected = vec![
            DiffLine::new_deleted("line1", 1),
            DiffLine::new_common("line2", 2, 1),
            DiffLine::new_deleted("line3", 3),
            DiffLine::new_added("line3_modified", 2),
            DiffLine::new_common("line4", 4, 3),
            DiffLine::new_added("line5", 4),
        ];

        assert_eq!(result.lines(), expected.as_slice());
    }

    #[test]
    fn test_swap_prefers_deletion() {
        let result = diff("a\nb", "b\na");
        let expected = vec![
            DiffLine::new_deleted("a", 1),
            DiffLine::new_common("b", 2, 1),
            DiffLine::new_added("a", 2),
        ];

        assert_eq!(result.lines(), expected.as_slice());
        assert_eq!(result, diff("a\nb", "b\na"));
    }

    #[test]
    fn test_replaced_line_deletes_before_adding() {
        let result = diff("x", "y");
        assert_eq!(
            result.lines(),
            &[DiffLine::new_deleted("x", 1), DiffLine::new_added("y", 1)]
        );
    }

    #[test]
    fn test_empty_target_is_all_deleted() {
        let result = diff("a\nb\nc\n", "");
        let expected = vec![
            DiffLine::new_deleted("a", 1),
            DiffLine::new_deleted("b", 2),
            DiffLine::new_deleted("c", 3),
        ];

        assert_eq!(result.lines(), expected.as_slice());
    }

    #[test]
    fn test_both_empty() {
        assert!(diff("", "").is_empty());
    }

    #[test]
    fn test_blank_line_baseline_is_not_empty() {
        // "\n" holds one empty line, so it takes the table path.
        let result = diff("\n", "\nx");
        assert_eq!(
            result.lines(),
            &[DiffLine::new_common("", 1, 1), DiffLine::new_added("x", 2)]
        );
    }

    #[test]
    fn test_trailing_terminator_is_ignored() {
        let result = diff("a\nb\n", "a\nb");
        assert!(!result.has_changes());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_crlf_matches_lf() {
        let result = diff("a\r\nb\r\n", "a\nb\n");
        assert!(!result.has_changes());
    }

    #[rstest]
    #[case("Hello", "hello")]
    #[case("x ", "x")]
    #[case("\tx", "    x")]
    fn test_comparison_is_exact(#[case] old: &str, #[case] new: &str) {
        let stats = diff(old, new).stats();
        assert_eq!((stats.common, stats.added, stats.deleted), (0, 1, 1));
    }

    #[test]
    fn test_lcs_table() {
        let old = ["a", "b", "c", "a", "b", "b", "a"];
        let new = ["c", "b", "a", "b", "a", "c"];
        let table = LcsTable::build(&old, &new);

        assert_eq!(table.lcs_len(), 4);
        assert_eq!(table.get(old.len(), 0), 0);
        assert_eq!(table.get(0, new.len()), 0);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = LineDiffEngine::new();
        let handles: Vec<_> = (0..4)
            .map(|n| {
                std::thread::spawn(move || {
                    let old = format!("keep\nold {n}\ntail");
                    let new = format!("keep\nnew {n}\ntail");
                    engine.diff(&old, &new).stats()
                })
            })
            .collect();

        for handle in handles {
            let stats = handle.join().unwrap();
            assert_eq!((stats.common, stats.added, stats.deleted), (2, 1, 1));
        }
    }

    fn lines_from(words: &[String]) -> String {
        words.join("\n")
    }

    /// Exact LCS length by memoized recursion over prefixes, kept separate
    /// from the table the engine uses.
    fn reference_lcs_len(old: &[&str], new: &[&str]) -> usize {
        fn go(
            old: &[&str],
            new: &[&str],
            i: usize,
            j: usize,
            memo: &mut HashMap<(usize, usize), usize>,
        ) -> usize {
            if i == 0 || j == 0 {
                return 0;
            }
            if let Some(&len) = memo.get(&(i, j)) {
                return len;
            }
            let len = if old[i - 1] == new[j - 1] {
                go(old, new, i - 1, j - 1, memo) + 1
            } else {
                go(old, new, i - 1, j, memo).max(go(old, new, i, j - 1, memo))
            };
            memo.insert((i, j), len);
            len
        }

        go(old, new, old.len(), new.len(), &mut HashMap::new())
    }

    #[test]
    fn test_minimal_edit_with_repeated_prefix() {
        let result = diff("ba
a", "ba
b
a
b");
        let expected = vec![
            DiffLine::new_common("ba", 1, 1),
            DiffLine::new_added("b", 2),
            DiffLine::new_common("a", 2, 3),
            DiffLine::new_added("b", 4),
        ];

        assert_eq!(result.lines(), expected.as_slice());
        assert_eq!(reference_lcs_len(&["ba", "a"], &["ba", "b", "a", "b"]), 2);
        assert_eq!(result.stats().common, 2);
    }

    fn small_doc() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[abc]{0,2}", 0..12)
    }

    proptest! {
        #[test]
        fn prop_covers_both_documents(old in small_doc(), new in small_doc()) {
            let (old_text, new_text) = (lines_from(&old), lines_from(&new));
            let old_lines = split_lines(&old_text);
            let new_lines = split_lines(&new_text);
            let result = diff(&old_text, &new_text);

            let old_side: Vec<(usize, &str)> = result
                .iter()
                .filter(|l| l.line_type != LineType::Added)
                .map(|l| (l.old_line_num.unwrap(), l.content.as_str()))
                .collect();
            let new_side: Vec<(usize, &str)> = result
                .iter()
                .filter(|l| l.line_type != LineType::Deleted)
                .map(|l| (l.new_line_num.unwrap(), l.content.as_str()))
                .collect();

            let expected_old: Vec<(usize, &str)> =
                old_lines.iter().enumerate().map(|(i, l)| (i + 1, *l)).collect();
            let expected_new: Vec<(usize, &str)> =
                new_lines.iter().enumerate().map(|(i, l)| (i + 1, *l)).collect();

            prop_assert_eq!(old_side, expected_old);
            prop_assert_eq!(new_side, expected_new);
        }

        #[test]
        fn prop_line_numbers_match_kind(old in small_doc(), new in small_doc()) {
            let result = diff(&lines_from(&old), &lines_from(&new));
            for line in &result {
                match line.line_type {
                    LineType::Common => {
                        prop_assert!(line.old_line_num.is_some() && line.new_line_num.is_some())
                    }
                    LineType::Added => {
                        prop_assert!(line.old_line_num.is_none() && line.new_line_num.is_some())
                    }
                    LineType::Deleted => {
                        prop_assert!(line.old_line_num.is_some() && line.new_line_num.is_none())
                    }
                }
            }
        }

        #[test]
        fn prop_identity_is_all_common(doc in small_doc()) {
            let text = lines_from(&doc);
            let result = diff(&text, &text);
            prop_assert!(!result.has_changes());
            for (idx, line) in result.iter().enumerate() {
                prop_assert_eq!(line.old_line_num, Some(idx + 1));
                prop_assert_eq!(line.new_line_num, Some(idx + 1));
            }
        }

        #[test]
        fn prop_edit_count_is_minimal(old in small_doc(), new in small_doc()) {
            let (old_text, new_text) = (lines_from(&old), lines_from(&new));
            let old_lines = split_lines(&old_text);
            let new_lines = split_lines(&new_text);

            let lcs = reference_lcs_len(&old_lines, &new_lines);
            let stats = diff(&old_text, &new_text).stats();

            prop_assert_eq!(stats.common, lcs);
            prop_assert_eq!(stats.changes(), old_lines.len() + new_lines.len() - 2 * lcs);
        }
    }
}
