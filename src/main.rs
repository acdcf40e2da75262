use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

use linediff::{
    app::App,
    config::{Args, Config, Source},
    logging,
    plain::{render_plain, render_stats},
    store::DirStore,
    ui::render_ui::{diff_area_width, ui},
};

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        app.fit_to_width(diff_area_width(terminal.size()?.width));
        terminal.draw(|f| ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('j') | KeyCode::Down => app.next_file(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_file(),
                KeyCode::Char('d') | KeyCode::PageDown => {
                    for _ in 0..10 {
                        app.scroll_down();
                    }
                }
                KeyCode::Char('u') | KeyCode::PageUp => {
                    for _ in 0..10 {
                        app.scroll_up();
                    }
                }
                KeyCode::Char('l') | KeyCode::Right => app.scroll_right(false),
                KeyCode::Char('h') | KeyCode::Left => app.scroll_left(false),
                KeyCode::Char('L') => app.scroll_right(true),
                KeyCode::Char('H') => app.scroll_left(true),
                KeyCode::Char('s') => {
                    let width = diff_area_width(terminal.size()?.width);
                    app.toggle_view_mode(width);
                }
                KeyCode::Char('?') => app.toggle_shortcuts(),
                KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
                KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),
                _ => {}
            }
        }
    }
}

fn run_tui(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn print_plain(app: &App) {
    for file in &app.files {
        print!("{}", render_plain(file));
        println!("{}", render_stats(&file.stats()));
    }
}

fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    let _logging = logging::init(&config.log_dir)?;
    tracing::info!(source = ?config.source, plain = config.plain, "starting");

    let mut app = App::new(config.side_by_side, &config.theme, config.max_cells)?;

    match &config.source {
        Source::Pair { old, new } => app.load_pair(old, new)?,
        Source::Baseline { dir, files, .. } => {
            let store = DirStore::new(dir);
            let paths: Vec<&Path> = files.iter().map(|p| p.as_path()).collect();
            app.load_snapshots(&store, &paths)?;
        }
    }

    if config.plain {
        print_plain(&app);
    } else if let Err(err) = run_tui(app) {
        tracing::error!(error = ?err, "viewer failed");
        println!("{err:?}");
        return Ok(());
    }

    if let Source::Baseline {
        dir,
        files,
        save: true,
    } = &config.source
    {
        let mut store = DirStore::new(dir);
        let paths: Vec<&Path> = files.iter().map(|p| p.as_path()).collect();
        App::save_snapshots(&mut store, &paths)?;
        println!("saved {} snapshot(s) to {}", paths.len(), dir.display());
    }

    Ok(())
}
