use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::{
    app::App,
    diff_file::FileStatus,
    ui::{
        footer::render_footer, side_by_side_diff::render_side_by_side_diff,
        unified_diff::render_unified_diff,
    },
};

/// Width of the file list on the left of the diff pane.
pub const FILE_LIST_WIDTH: u16 = 30;
/// Narrowest diff pane that still gets the side-by-side view.
pub const SIDE_BY_SIDE_MIN_WIDTH: u16 = 120;

/// Width left for the diff pane in a terminal `terminal_width` columns wide.
pub fn diff_area_width(terminal_width: u16) -> u16 {
    terminal_width.saturating_sub(FILE_LIST_WIDTH)
}

pub fn status_color(status: FileStatus) -> Color {
    match status {
        FileStatus::Added => Color::Green,
        FileStatus::Deleted => Color::Red,
        FileStatus::Modified => Color::Yellow,
        FileStatus::Unchanged => Color::White,
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    // Main layout with optional footer
    let (content_area, footer_area) = if app.show_shortcuts {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);
        (main_chunks[0], Some(main_chunks[1]))
    } else {
        (size, None)
    };

    // Content layout (file list and diff)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FILE_LIST_WIDTH), Constraint::Min(0)])
        .split(content_area);

    let files: Vec<ListItem> = app
        .files
        .iter()
        .map(|file| {
            let status = file.get_status();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", status.as_char()),
                    Style::default()
                        .fg(status_color(status))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(file.get_name()),
            ]))
        })
        .collect();

    let files_list = List::new(files)
        .block(Block::default().borders(Borders::ALL).title("Files"))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state.clone());

    if let Some(file) = app.selected() {
        let diff_area = chunks[1];

        if app.show_side_by_side && diff_area.width >= SIDE_BY_SIDE_MIN_WIDTH {
            render_side_by_side_diff(f, diff_area, file, app.scroll_offset, app);
        } else {
            render_unified_diff(f, diff_area, file, app.scroll_offset, app);
        }
    }

    if let Some(footer_area) = footer_area {
        render_footer(f, footer_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_THEME;
    use crate::diff_file::DiffFile;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn app_with(file: DiffFile, side_by_side: bool) -> App {
        let mut app = App::new(side_by_side, DEFAULT_THEME, 1_000).unwrap();
        app.files = vec![file];
        app
    }

    #[test]
    fn test_unified_view_renders_lines() {
        let file = DiffFile::compare("notes.txt", Some("one\ntwo\nthree"), Some("one\ntwo\nTHREE\nfour"));
        let app = app_with(file, false);
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|f| ui(f, &app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("M notes.txt"));
        assert!(text.contains("   3:     - three"));
        assert!(text.contains("        4 + four"));
        assert!(text.contains("Shortcuts"));
    }

    #[test]
    fn test_side_by_side_view_renders_panels() {
        let file = DiffFile::compare("notes.txt", Some("a\nb"), Some("a\nc"));
        let app = app_with(file, true);
        let mut terminal = Terminal::new(TestBackend::new(160, 20)).unwrap();

        terminal.draw(|f| ui(f, &app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Old: notes.txt"));
        assert!(text.contains("New: notes.txt"));
        assert!(text.contains("   2 b"));
        assert!(text.contains("   2 c"));
    }

    #[test]
    fn test_narrow_terminal_falls_back_to_unified() {
        let file = DiffFile::compare("notes.txt", Some("a"), Some("b"));
        let app = app_with(file, true);
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();

        terminal.draw(|f| ui(f, &app)).unwrap();

        assert!(!screen_text(&terminal).contains("Old: notes.txt"));
    }

    #[test]
    fn test_side_by_side_scrolls_to_last_row() {
        let old: Vec<String> = (0..30).map(|n| format!("old{n}")).collect();
        let new: Vec<String> = (0..30).map(|n| format!("new{n}")).collect();
        let file = DiffFile::compare("swap.txt", Some(&old.join("\n")), Some(&new.join("\n")));
        assert_eq!(file.line_count(), 60);
        let mut app = app_with(file, true);
        let mut terminal = Terminal::new(TestBackend::new(160, 20)).unwrap();

        app.scroll_to_bottom();
        assert_eq!(app.scroll_offset, 29);
        for _ in 0..10 {
            app.scroll_down();
        }
        assert_eq!(app.scroll_offset, 29);

        terminal.draw(|f| ui(f, &app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("  30 old29"));
        assert!(text.contains("  30 new29"));
    }

    #[test]
    fn test_toggle_uses_diff_pane_width() {
        let file = DiffFile::compare("notes.txt", Some("a"), Some("b"));
        let mut app = app_with(file, false);

        app.toggle_view_mode(diff_area_width(130));
        assert!(!app.show_side_by_side);

        app.toggle_view_mode(diff_area_width(150));
        assert!(app.show_side_by_side);
        let mut terminal = Terminal::new(TestBackend::new(150, 12)).unwrap();
        terminal.draw(|f| ui(f, &app)).unwrap();
        assert!(screen_text(&terminal).contains("Old: notes.txt"));
    }
}
