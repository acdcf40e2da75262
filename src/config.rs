use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

pub const DEFAULT_THEME: &str = "base16-ocean.dark";
pub const DEFAULT_MAX_CELLS: usize = 25_000_000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// `OLD NEW` to compare two files, or the files to check against `--baseline`
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Directory of saved snapshots to use as the old side of each file
    #[arg(long, env = "LINEDIFF_BASELINE")]
    pub baseline: Option<PathBuf>,

    /// Store the current contents as the new baseline after viewing
    #[arg(long, requires = "baseline")]
    pub save: bool,

    /// Start in side-by-side view
    #[arg(short, long)]
    pub side_by_side: bool,

    /// Print a unified diff to stdout instead of opening the viewer
    #[arg(short, long)]
    pub plain: bool,

    /// Syntax highlighting theme
    #[arg(long, env = "LINEDIFF_THEME", default_value = DEFAULT_THEME)]
    pub theme: String,

    /// Refuse to diff a pair whose line counts multiply past this value
    #[arg(long, env = "LINEDIFF_MAX_CELLS", default_value_t = DEFAULT_MAX_CELLS)]
    pub max_cells: usize,

    /// Where log files are written
    #[arg(long, env = "LINEDIFF_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Pair {
        old: PathBuf,
        new: PathBuf,
    },
    Baseline {
        dir: PathBuf,
        files: Vec<PathBuf>,
        save: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: Source,
    pub side_by_side: bool,
    pub plain: bool,
    pub theme: String,
    pub max_cells: usize,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let source = match args.baseline {
            Some(dir) => Source::Baseline {
                dir,
                files: args.paths,
                save: args.save,
            },
            None => {
                let [old, new]: [PathBuf; 2] = match args.paths.try_into() {
                    Ok(pair) => pair,
                    Err(paths) => bail!(
                        "expected OLD and NEW paths, got {} path(s); use --baseline to check files against snapshots",
                        paths.len()
                    ),
                };
                Source::Pair { old, new }
            }
        };

        if args.max_cells == 0 {
            bail!("--max-cells must be greater than zero");
        }

        Ok(Self {
            source,
            side_by_side: args.side_by_side,
            plain: args.plain,
            theme: args.theme,
            max_cells: args.max_cells,
            log_dir: args
                .log_dir
                .unwrap_or_else(|| std::env::temp_dir().join("linediff").join("logs")),
        })
    }
}
