use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ratatui::widgets::ListState;
use syntect::{
    highlighting::{Theme, ThemeSet},
    parsing::SyntaxSet,
};
use tracing::{info, warn};

use crate::diff_file::DiffFile;
use crate::document::line_count;
use crate::store::SnapshotStore;
use crate::ui::diff_utils::side_by_side_rows;
use crate::ui::render_ui::SIDE_BY_SIDE_MIN_WIDTH;

const HORIZONTAL_STEP: usize = 4;
const HORIZONTAL_PAGE: usize = 40;

pub struct App {
    pub files: Vec<DiffFile>,
    pub selected_file: usize,
    pub file_list_state: ListState,
    pub scroll_offset: usize,
    pub horizontal_scroll_offset: usize,
    pub show_side_by_side: bool,
    pub show_shortcuts: bool,
    pub max_cells: usize,
    theme_name: String,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl App {
    pub fn new(show_side_by_side: bool, theme_name: &str, max_cells: usize) -> Result<Self> {
        let theme_set = ThemeSet::load_defaults();
        if !theme_set.themes.contains_key(theme_name) {
            let available: Vec<&str> = theme_set.themes.keys().map(String::as_str).collect();
            bail!(
                "unknown theme {theme_name:?}, available: {}",
                available.join(", ")
            );
        }

        let mut state = ListState::default();
        state.select(Some(0));

        Ok(Self {
            files: Vec::new(),
            selected_file: 0,
            file_list_state: state,
            scroll_offset: 0,
            horizontal_scroll_offset: 0,
            show_side_by_side,
            show_shortcuts: true,
            max_cells,
            theme_name: theme_name.to_string(),
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
        })
    }

    /// Compares two files on disk. A missing `old` file counts as an empty baseline.
    pub fn load_pair(&mut self, old: &Path, new: &Path) -> Result<()> {
        let old_text = read_optional(old)?;
        let new_text = read_optional(new)?;
        if new_text.is_none() {
            bail!("{} does not exist", new.display());
        }

        let name = new.display().to_string();
        let file = self.compare(&name, old_text.as_deref(), new_text.as_deref())?;
        self.set_files(vec![file]);
        Ok(())
    }

    /// Compares each file against the snapshot stored under its path.
    ///
    /// A file whose snapshot or current contents cannot be read is skipped
    /// with a warning; loading fails only when no file could be read.
    pub fn load_snapshots<S: SnapshotStore>(&mut self, store: &S, files: &[&Path]) -> Result<()> {
        let mut loaded = Vec::with_capacity(files.len());
        let mut last_error = None;
        for path in files {
            let key = path.to_string_lossy();
            let (baseline, current) = match read_both(store, &key, path) {
                Ok(texts) => texts,
                Err(err) => {
                    warn!(file = %key, error = %format!("{err:#}"), "skipping unreadable file");
                    last_error = Some(err);
                    continue;
                }
            };
            if baseline.is_none() && current.is_none() {
                bail!("{} has neither a snapshot nor a file on disk", path.display());
            }
            loaded.push(self.compare(&key, baseline.as_deref(), current.as_deref())?);
        }

        if loaded.is_empty()
            && let Some(err) = last_error
        {
            return Err(err.context("no file could be loaded"));
        }

        self.set_files(loaded);
        Ok(())
    }

    /// Writes every file that still exists back to `store` as its new baseline.
    pub fn save_snapshots<S: SnapshotStore>(store: &mut S, files: &[&Path]) -> Result<()> {
        for path in files {
            if let Some(text) = read_optional(path)? {
                store.save(&path.to_string_lossy(), &text)?;
            }
        }
        Ok(())
    }

    fn compare(&self, name: &str, old: Option<&str>, new: Option<&str>) -> Result<DiffFile> {
        let cells = line_count(old.unwrap_or_default())
            .saturating_mul(line_count(new.unwrap_or_default()));
        if cells > self.max_cells {
            warn!(name, cells, max_cells = self.max_cells, "diff too large");
            bail!(
                "{name} is too large to diff ({cells} table cells, limit {})",
                self.max_cells
            );
        }

        let file = DiffFile::compare(name, old, new);
        let stats = file.stats();
        info!(
            name,
            status = %file.get_status().as_char(),
            added = stats.added,
            deleted = stats.deleted,
            "compared file"
        );
        Ok(file)
    }

    fn set_files(&mut self, files: Vec<DiffFile>) {
        self.files = files;
        self.selected_file = 0;
        self.scroll_offset = 0;
        self.horizontal_scroll_offset = 0;
        if !self.files.is_empty() {
            self.file_list_state.select(Some(0));
        }
    }

    pub fn next_file(&mut self) {
        if !self.files.is_empty() {
            self.selected_file = (self.selected_file + 1) % self.files.len();
            self.file_list_state.select(Some(self.selected_file));
            self.reset_scroll();
        }
    }

    pub fn previous_file(&mut self) {
        if !self.files.is_empty() {
            self.selected_file = if self.selected_file == 0 {
                self.files.len() - 1
            } else {
                self.selected_file - 1
            };
            self.file_list_state.select(Some(self.selected_file));
            self.reset_scroll();
        }
    }

    fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
        self.horizontal_scroll_offset = 0;
    }

    /// Number of rows the active view scrolls over. Side-by-side pairs
    /// deletions with additions, so it can be shorter than the unified view.
    pub fn view_len(&self) -> usize {
        match self.selected() {
            Some(file) if self.show_side_by_side => side_by_side_rows(file.lines()).len(),
            Some(file) => file.line_count(),
            None => 0,
        }
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.view_len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset + 1 < self.view_len() {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.view_len().saturating_sub(1);
    }

    pub fn scroll_right(&mut self, page: bool) {
        let step = if page { HORIZONTAL_PAGE } else { HORIZONTAL_STEP };
        self.horizontal_scroll_offset = self
            .horizontal_scroll_offset
            .saturating_add(step)
            .min(u16::MAX as usize);
    }

    pub fn scroll_left(&mut self, page: bool) {
        let step = if page { HORIZONTAL_PAGE } else { HORIZONTAL_STEP };
        self.horizontal_scroll_offset = self.horizontal_scroll_offset.saturating_sub(step);
    }

    /// `diff_width` is the width of the diff pane, not of the whole terminal.
    pub fn toggle_view_mode(&mut self, diff_width: u16) {
        self.show_side_by_side = diff_width >= SIDE_BY_SIDE_MIN_WIDTH && !self.show_side_by_side;
        self.clamp_scroll();
    }

    /// Falls back to the unified view when the diff pane is too narrow for
    /// side-by-side.
    pub fn fit_to_width(&mut self, diff_width: u16) {
        if self.show_side_by_side && diff_width < SIDE_BY_SIDE_MIN_WIDTH {
            self.show_side_by_side = false;
            self.clamp_scroll();
        }
    }

    pub fn toggle_shortcuts(&mut self) {
        self.show_shortcuts = !self.show_shortcuts;
    }

    pub fn selected(&self) -> Option<&DiffFile> {
        self.files.get(self.selected_file)
    }

    pub fn get_syntax_for_file(
        &self,
        filename: &str,
    ) -> Option<&syntect::parsing::SyntaxReference> {
        // Try by extension first
        if let Some(extension) = Path::new(filename).extension()
            && let Some(ext_str) = extension.to_str()
        {
            match ext_str {
                "ts" | "tsx" => {
                    // TypeScript isn't in default syntect
                    return self
                        .syntax_set
                        .find_syntax_by_extension("js")
                        .or_else(|| self.syntax_set.find_syntax_by_name("JavaScript"));
                }
                "jsx" => return self.syntax_set.find_syntax_by_extension("js"),
                "cc" | "cxx" | "hpp" => return self.syntax_set.find_syntax_by_extension("cpp"),
                _ => {
                    if let Some(syntax) = self.syntax_set.find_syntax_by_extension(ext_str) {
                        return Some(syntax);
                    }
                }
            }
        }

        self.syntax_set
            .find_syntax_for_file(filename)
            .ok()
            .flatten()
    }

    pub fn get_theme(&self) -> &Theme {
        // Checked in `new`.
        &self.theme_set.themes[&self.theme_name]
    }

    pub fn get_syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }
}

fn read_both<S: SnapshotStore>(
    store: &S,
    key: &str,
    path: &Path,
) -> Result<(Option<String>, Option<String>)> {
    Ok((store.load(key)?, read_optional(path)?))
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}
