use crate::diff_file::{DiffFile, DiffLine, DiffStats, LineType};

pub fn render_plain(file: &DiffFile) -> String {
    let name = file.get_name();
    let mut out = format!("--- a/{name}\n+++ b/{name}\n");

    for line in file.lines() {
        out.push_str(&render_line(line));
        out.push('\n');
    }

    out
}

pub fn render_line(line: &DiffLine) -> String {
    let glyph = match line.line_type {
        LineType::Common => ' ',
        LineType::Added => '+',
        LineType::Deleted => '-',
    };

    format!(
        "{} {} {}{}",
        line_num_column(line.old_line_num),
        line_num_column(line.new_line_num),
        glyph,
        line.content
    )
}

pub fn render_stats(stats: &DiffStats) -> String {
    format!(
        "{} {}(+), {} {}(-)",
        stats.added,
        plural(stats.added, "insertion"),
        stats.deleted,
        plural(stats.deleted, "deletion")
    )
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

fn line_num_column(num: Option<usize>) -> String {
    match num {
        Some(n) => format!("{n:>4}"),
        None => "    ".to_string(),
    }
}
