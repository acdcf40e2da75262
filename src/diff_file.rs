use crate::engine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub line_type: LineType,
    pub old_line_num: Option<usize>,
    pub new_line_num: Option<usize>,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    Common,
    Added,
    Deleted,
}

impl DiffLine {
    pub fn new_added(line: &str, line_number: usize) -> Self {
        Self {
            line_type: LineType::Added,
            old_line_num: None,
            new_line_num: Some(line_number),
            content: line.to_string(),
        }
    }

    pub fn new_deleted(line: &str, line_number: usize) -> Self {
        Self {
            line_type: LineType::Deleted,
            old_line_num: Some(line_number),
            new_line_num: None,
            content: line.to_string(),
        }
    }

    pub fn new_common(line: &str, old_line_num: usize, new_line_num: usize) -> Self {
        Self {
            line_type: LineType::Common,
            old_line_num: Some(old_line_num),
            new_line_num: Some(new_line_num),
            content: line.to_string(),
        }
    }

    pub fn is_change(&self) -> bool {
        self.line_type != LineType::Common
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub common: usize,
    pub added: usize,
    pub deleted: usize,
}

impl DiffStats {
    pub fn changes(&self) -> usize {
        self.added + self.deleted
    }
}

/// Ordered, annotated alignment of two documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    lines: Vec<DiffLine>,
}

impl DiffResult {
    pub(crate) fn from_lines(lines: Vec<DiffLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffLine> {
        self.lines.iter()
    }

    pub fn stats(&self) -> DiffStats {
        self.lines
            .iter()
            .fold(DiffStats::default(), |mut stats, line| {
                match line.line_type {
                    LineType::Common => stats.common += 1,
                    LineType::Added => stats.added += 1,
                    LineType::Deleted => stats.deleted += 1,
                }
                stats
            })
    }

    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(DiffLine::is_change)
    }
}

impl IntoIterator for DiffResult {
    type Item = DiffLine;
    type IntoIter = std::vec::IntoIter<DiffLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiffResult {
    type Item = &'a DiffLine;
    type IntoIter = std::slice::Iter<'a, DiffLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Deleted,
    Modified,
    Unchanged,
}

impl FileStatus {
    pub fn as_char(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Deleted => 'D',
            FileStatus::Modified => 'M',
            FileStatus::Unchanged => '=',
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiffFile {
    name: String,
    status: FileStatus,
    result: DiffResult,
}

impl DiffFile {
    /// Diffs two versions of `name`. A missing side is treated as empty text,
    /// so a file without a baseline comes out entirely added.
    pub fn compare(name: &str, old: Option<&str>, new: Option<&str>) -> Self {
        let old_text = old.unwrap_or_default();
        let new_text = new.unwrap_or_default();
        let result = engine::diff(old_text, new_text);

        let status = if new.is_none() {
            FileStatus::Deleted
        } else if old_text.is_empty() && !new_text.is_empty() {
            FileStatus::Added
        } else if result.has_changes() {
            FileStatus::Modified
        } else {
            FileStatus::Unchanged
        };

        Self {
            name: name.to_string(),
            status,
            result,
        }
    }

    pub fn line_count(&self) -> usize {
        self.result.len()
    }

    pub fn lines(&self) -> &[DiffLine] {
        self.result.lines()
    }

    pub fn result(&self) -> &DiffResult {
        &self.result
    }

    pub fn stats(&self) -> DiffStats {
        self.result.stats()
    }

    pub fn get_status(&self) -> FileStatus {
        self.status
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}
