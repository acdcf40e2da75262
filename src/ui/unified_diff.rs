use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use syntect::{
    highlighting::Theme,
    parsing::{SyntaxReference, SyntaxSet},
};

use crate::{
    app::App,
    diff_file::{DiffFile, DiffLine, LineType},
    plain::render_stats,
    ui::{
        diff_utils::{apply_diff_highlight, compute_intra_line_diff, pair_changed_lines},
        highlight_line::{highlight_line_content, with_background},
    },
};

pub const ADDED_BG: Color = Color::Rgb(0, 100, 0);
pub const ADDED_DIM_BG: Color = Color::Rgb(0, 60, 0);
pub const DELETED_BG: Color = Color::Rgb(139, 0, 0);
pub const DELETED_DIM_BG: Color = Color::Rgb(80, 0, 0);

pub fn render_unified_diff(
    f: &mut Frame,
    area: Rect,
    file: &DiffFile,
    scroll_offset: usize,
    app: &App,
) {
    let visible_lines = area.height.saturating_sub(2) as usize; // Account for borders
    let syntax = app.get_syntax_for_file(file.get_name());
    let theme = app.get_theme();

    let all_lines = file.lines();
    let partners = pair_changed_lines(all_lines);
    let end_line = (scroll_offset + visible_lines).min(all_lines.len());

    let lines: Vec<Line> = (scroll_offset.min(end_line)..end_line)
        .map(|i| {
            let diff_line = &all_lines[i];
            let intra = partners[i].map(|partner| {
                let (old, new) = match diff_line.line_type {
                    LineType::Deleted => (diff_line, &all_lines[partner]),
                    _ => (&all_lines[partner], diff_line),
                };
                let (old_ranges, new_ranges) = compute_intra_line_diff(&old.content, &new.content);
                match diff_line.line_type {
                    LineType::Deleted => old_ranges,
                    _ => new_ranges,
                }
            });

            render_diff_line(
                diff_line,
                syntax,
                app.get_syntax_set(),
                theme,
                intra.as_deref(),
            )
        })
        .collect();

    let stats = file.stats();
    let title = format!(
        "{} [{}] {}",
        file.get_name(),
        file.get_status().as_char(),
        render_stats(&stats)
    );

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((0, app.horizontal_scroll_offset as u16));

    f.render_widget(paragraph, area);

    let total_lines = file.line_count();
    if total_lines > visible_lines {
        let mut scrollbar_state = ScrollbarState::new(total_lines).position(scroll_offset);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

pub fn line_number_gutter(diff_line: &DiffLine) -> String {
    match (diff_line.old_line_num, diff_line.new_line_num) {
        (Some(old), Some(new)) => format!("{old:4}:{new:4} "),
        (Some(old), None) => format!("{old:4}:     "),
        (None, Some(new)) => format!("     {new:4} "),
        (None, None) => "          ".to_string(),
    }
}

fn render_diff_line<'a>(
    diff_line: &'a DiffLine,
    syntax: Option<&SyntaxReference>,
    syntax_set: &SyntaxSet,
    theme: &Theme,
    intra_line_ranges: Option<&[std::ops::Range<usize>]>,
) -> Line<'a> {
    let mut spans = vec![Span::styled(
        line_number_gutter(diff_line),
        Style::default().fg(Color::DarkGray),
    )];

    let (bg_color, prefix) = match diff_line.line_type {
        LineType::Added => (Some((ADDED_BG, ADDED_DIM_BG)), "+ "),
        LineType::Deleted => (Some((DELETED_BG, DELETED_DIM_BG)), "- "),
        LineType::Common => (None, "  "),
    };

    spans.push(Span::styled(
        prefix,
        match bg_color {
            Some((bg, _)) => Style::default().bg(bg).fg(Color::White),
            None => Style::default().fg(Color::White),
        },
    ));

    let highlighted_spans = highlight_line_content(&diff_line.content, syntax, syntax_set, theme);

    match (bg_color, intra_line_ranges) {
        (Some((bg, dim_bg)), Some(ranges)) => {
            // Unchanged characters are dimmed so the edited ones stand out
            spans.extend(apply_diff_highlight(highlighted_spans, ranges, dim_bg, bg));
        }
        (Some((bg, _)), None) => spans.extend(with_background(highlighted_spans, bg)),
        (None, _) => spans.extend(highlighted_spans),
    }

    Line::from(spans)
}
