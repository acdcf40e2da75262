use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::{
    app::App,
    diff_file::{DiffFile, DiffLine, LineType},
    ui::{
        diff_utils::{SideBySideRow, apply_diff_highlight, compute_intra_line_diff, side_by_side_rows},
        highlight_line::{highlight_line_content, with_background},
        unified_diff::{ADDED_BG, ADDED_DIM_BG, DELETED_BG, DELETED_DIM_BG},
    },
};

const FILLER_BG: Color = Color::Rgb(40, 40, 40);

#[derive(Clone, Copy)]
enum Side {
    Old,
    New,
}

pub fn render_side_by_side_diff(
    f: &mut Frame,
    area: Rect,
    file: &DiffFile,
    scroll_offset: usize,
    app: &App,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let visible_lines = area.height.saturating_sub(2) as usize;
    let panel_width = (chunks[0].width.saturating_sub(2)) as usize; // Width minus borders

    let rows = side_by_side_rows(file.lines());
    let mut old_lines = Vec::new();
    let mut new_lines = Vec::new();

    for row in rows.iter().skip(scroll_offset).take(visible_lines) {
        let (old_ranges, new_ranges) = match (row.old, row.new) {
            (Some(old), Some(new)) if old.is_change() => {
                let (o, n) = compute_intra_line_diff(&old.content, &new.content);
                (Some(o), Some(n))
            }
            _ => (None, None),
        };

        old_lines.push(render_cell(row, Side::Old, old_ranges.as_deref(), panel_width, app, file));
        new_lines.push(render_cell(row, Side::New, new_ranges.as_deref(), panel_width, app, file));
    }

    let old_title = format!("Old: {}", file.get_name());
    let new_title = format!("New: {}", file.get_name());

    let old_paragraph = Paragraph::new(Text::from(old_lines))
        .block(Block::default().borders(Borders::ALL).title(old_title))
        .scroll((0, app.horizontal_scroll_offset as u16));

    let new_paragraph = Paragraph::new(Text::from(new_lines))
        .block(Block::default().borders(Borders::ALL).title(new_title))
        .scroll((0, app.horizontal_scroll_offset as u16));

    f.render_widget(old_paragraph, chunks[0]);
    f.render_widget(new_paragraph, chunks[1]);

    let total_rows = rows.len();
    if total_rows > visible_lines {
        let mut scrollbar_state = ScrollbarState::new(total_rows).position(scroll_offset);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        for chunk in [chunks[0], chunks[1]] {
            f.render_stateful_widget(
                scrollbar.clone(),
                chunk.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }
}

fn render_cell<'a>(
    row: &SideBySideRow<'a>,
    side: Side,
    intra_line_ranges: Option<&[std::ops::Range<usize>]>,
    panel_width: usize,
    app: &App,
    file: &DiffFile,
) -> Line<'a> {
    let line = match side {
        Side::Old => row.old,
        Side::New => row.new,
    };

    let Some(diff_line) = line else {
        // Empty line with background fill matching panel width
        return Line::from(Span::styled(
            " ".repeat(panel_width),
            Style::default().bg(FILLER_BG),
        ));
    };

    let syntax = app.get_syntax_for_file(file.get_name());
    let highlighted_spans = highlight_line_content(
        &diff_line.content,
        syntax,
        app.get_syntax_set(),
        app.get_theme(),
    );

    let mut spans = vec![Span::styled(
        format!("{:4} ", side_line_num(diff_line, side)),
        Style::default().fg(Color::DarkGray),
    )];

    let colors = match diff_line.line_type {
        LineType::Added => Some((ADDED_BG, ADDED_DIM_BG)),
        LineType::Deleted => Some((DELETED_BG, DELETED_DIM_BG)),
        LineType::Common => None,
    };

    match (colors, intra_line_ranges) {
        (Some((bg, dim_bg)), Some(ranges)) => {
            spans.extend(apply_diff_highlight(highlighted_spans, ranges, dim_bg, bg));
        }
        (Some((bg, _)), None) => spans.extend(with_background(highlighted_spans, bg)),
        (None, _) => spans.extend(highlighted_spans),
    }

    Line::from(spans)
}

fn side_line_num(diff_line: &DiffLine, side: Side) -> usize {
    match side {
        Side::Old => diff_line.old_line_num,
        Side::New => diff_line.new_line_num,
    }
    .unwrap_or(0)
}
