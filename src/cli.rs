use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::app;
use crate::color::ColorMap;
use crate::data::loader;
use crate::data::model::{FigureSpec, Series, SeriesSheet, SeriesStyle};
use crate::data::transform;
use crate::export;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Argument surface
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "benchview",
    about = "Plot benchmark timing logs",
    version,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Files to preload into the viewer
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Overlay timing series from several runs
    Compare {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Keep only the first N rows of every file
        #[arg(long, value_name = "N")]
        head: Option<usize>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, default_value = "")]
        xlabel: String,

        #[arg(long, default_value = "")]
        ylabel: String,

        /// Write a PNG instead of opening the viewer
        #[arg(short, long, value_name = "PNG")]
        out: Option<PathBuf>,
    },

    /// Chart per-commit object counts extracted from a node log
    Objects {
        /// Node log with 'created by commit' lines
        #[arg(short = 'l', value_name = "LOG")]
        log: PathBuf,

        /// Per-block validation times; switches the x axis to cumulative time
        #[arg(short = 'b', value_name = "TIMES")]
        times: Option<PathBuf>,

        /// Write the surviving counts to this file
        #[arg(long, value_name = "PATH")]
        dump: Option<PathBuf>,

        /// Write a PNG instead of opening the viewer
        #[arg(short, long, value_name = "PNG")]
        out: Option<PathBuf>,
    },

    /// Outer-join two indexed pair files and chart the left values
    Merge {
        left: PathBuf,
        right: PathBuf,

        /// Keep only the first N rows of LEFT
        #[arg(long, value_name = "N")]
        head_left: Option<usize>,

        /// Keep only the first N rows of RIGHT
        #[arg(long, value_name = "N")]
        head_right: Option<usize>,

        /// Write a PNG instead of opening the viewer
        #[arg(short, long, value_name = "PNG")]
        out: Option<PathBuf>,
    },

    /// Point chart of an indexed pair file
    Scatter {
        file: PathBuf,

        /// Legend label; the value total is appended
        #[arg(long)]
        label: Option<String>,

        #[arg(long, default_value = "")]
        xlabel: String,

        #[arg(long, default_value = "")]
        ylabel: String,

        /// Write a PNG instead of opening the viewer
        #[arg(short, long, value_name = "PNG")]
        out: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => view(&cli.files),
        Some(Command::Compare {
            files,
            head,
            title,
            xlabel,
            ylabel,
            out,
        }) => compare(&files, head, title, xlabel, ylabel, out),
        Some(Command::Objects {
            log,
            times,
            dump,
            out,
        }) => objects(&log, times.as_deref(), dump.as_deref(), out),
        Some(Command::Merge {
            left,
            right,
            head_left,
            head_right,
            out,
        }) => merge(&left, &right, head_left, head_right, out),
        Some(Command::Scatter {
            file,
            label,
            xlabel,
            ylabel,
            out,
        }) => scatter(&file, label, xlabel, ylabel, out),
    }
}

/// Open the chart: PNG when `-o` was given, the viewer window otherwise.
fn finish(series: Vec<Series>, figure: FigureSpec, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            let sheet = SeriesSheet::from_series(series);
            let colors = ColorMap::new(&sheet.names);
            export::save_png(&sheet.series, &figure, &colors, &path, export::DEFAULT_SIZE)?;
            log::info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            let mut state = AppState::default();
            state.figure = figure;
            state.set_sheet(SeriesSheet::from_series(series));
            app::run_viewer(state)
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

fn view(files: &[PathBuf]) -> Result<()> {
    let mut state = AppState::default();
    for path in files {
        let series = loader::load_file(path)?;
        log::info!("loaded {} series from {}", series.len(), path.display());
        state.add_series(series);
    }
    app::run_viewer(state)
}

fn compare(
    files: &[PathBuf],
    head: Option<usize>,
    title: Option<String>,
    xlabel: String,
    ylabel: String,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut series = Vec::with_capacity(files.len());
    for path in files {
        let mut s = loader::load_series(path)?;
        if let Some(n) = head {
            s = transform::head(&s, n);
        }
        series.push(s);
    }
    finish(series, FigureSpec::new(title, xlabel, ylabel), out)
}

fn objects(
    log: &Path,
    times: Option<&Path>,
    dump: Option<&Path>,
    out: Option<PathBuf>,
) -> Result<()> {
    let counts = loader::load_commit_log(log)?;
    log::info!("{}: {} commits", log.display(), counts.len());

    match times {
        Some(times_path) => {
            if dump.is_some() {
                log::warn!("--dump only applies without -b, ignoring");
            }
            let block_times = loader::load_series(times_path)?;
            let by_time = transform::with_cumulative_index(&counts, &block_times)?;
            let figure = FigureSpec::new(
                Some("Objects created by each commit".to_string()),
                "Time taken",
                "Number of objects",
            );
            finish(vec![by_time], figure, out)
        }
        None => {
            let kept = transform::reindex(&transform::drop_freezes(&counts), 1.0);
            if let Some(dump_path) = dump {
                write_counts(dump_path, &kept)?;
            }
            let figure = FigureSpec::new(
                Some("Objects created by each commit".to_string()),
                "Number of commits",
                "Number of objects",
            );
            finish(vec![kept], figure, out)
        }
    }
}

/// Dump the extracted counts, one per line under a tab-separated header.
fn write_counts(path: &Path, counts: &Series) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "num_of_objects\ttime_to_create")?;
    for &v in &counts.y {
        writeln!(file, "{}", v as i64)?;
    }
    Ok(())
}

fn merge(
    left: &Path,
    right: &Path,
    head_left: Option<usize>,
    head_right: Option<usize>,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut l = loader::load_pairs(left)?;
    let mut r = loader::load_pairs(right)?;
    if let Some(n) = head_left {
        l = transform::head(&l, n);
    }
    if let Some(n) = head_right {
        r = transform::head(&r, n);
    }

    let merged = transform::merge_outer(&l, &r);
    let joined = merged.left_series(l.name.clone(), SeriesStyle::Line);
    finish(vec![joined], FigureSpec::default(), out)
}

fn scatter(
    file: &Path,
    label: Option<String>,
    xlabel: String,
    ylabel: String,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut s = loader::load_pairs(file)?;
    s.style = SeriesStyle::Points;

    let total = s.y_sum();
    log::info!(
        "{}: {} rows, max {:?}, sum {total}",
        file.display(),
        s.len(),
        s.y_max()
    );

    if let Some(label) = label {
        s.name = format!("{label} (total {total}s)");
    }

    finish(vec![s], FigureSpec::new(None, xlabel, ylabel), out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_files_parse_without_a_subcommand() {
        let cli = Cli::try_parse_from(["benchview", "a.csv", "b.csv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn objects_takes_short_log_and_times_flags() {
        let cli =
            Cli::try_parse_from(["benchview", "objects", "-l", "node.log", "-b", "times"]).unwrap();
        match cli.command {
            Some(Command::Objects { log, times, .. }) => {
                assert_eq!(log, PathBuf::from("node.log"));
                assert_eq!(times, Some(PathBuf::from("times")));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn compare_requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["benchview", "compare"]).is_err());
        let cli =
            Cli::try_parse_from(["benchview", "compare", "t1", "t2", "--head", "100"]).unwrap();
        match cli.command {
            Some(Command::Compare { files, head, .. }) => {
                assert_eq!(files.len(), 2);
                assert_eq!(head, Some(100));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn dump_file_writes_header_then_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("object_time_output");
        let counts = Series::from_values("n", vec![153.0, 97.0], SeriesStyle::Step);
        write_counts(&path, &counts).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "num_of_objects\ttime_to_create\n153\n97\n");
    }
}
