use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::model::{Series, SeriesStyle};

/// Marker carried by log lines that report an object count.
pub const COMMIT_MARKER: &str = "created by commit";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load any supported benchmark log. Dispatch by extension for `.json`,
/// otherwise by sniffing the first few lines of content.
///
/// Supported formats:
/// * timing series – one number per line (an optional header line is skipped)
/// * indexed pairs – headerless two-column CSV, `index,value`
/// * commit log    – raw text; lines containing `created by commit` carry an
///   object count as the second-to-last whitespace token
/// * `.json`       – `[{ "name": "...", "y": [...], "x": [...]? }, ...]`
pub fn load_file(path: &Path) -> Result<Vec<Series>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext == "json" {
        return load_json(path);
    }

    match sniff_kind(path)? {
        FileKind::CommitLog => Ok(vec![load_commit_log(path)?]),
        FileKind::Pairs => Ok(vec![load_pairs(path)?]),
        FileKind::Values => Ok(vec![load_series(path)?]),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Values,
    Pairs,
    CommitLog,
}

/// Decide what kind of file this is from its first few KiB: a commit marker
/// anywhere in the sample wins, then a comma in the first data line means
/// pairs, else a plain timing series.
fn sniff_kind(path: &Path) -> Result<FileKind> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = Vec::new();
    file.take(8192)
        .read_to_end(&mut buf)
        .with_context(|| format!("reading {}", path.display()))?;
    let sample = String::from_utf8_lossy(&buf);

    let mut first_data_line = None;
    for line in sample.lines() {
        if line.contains(COMMIT_MARKER) {
            return Ok(FileKind::CommitLog);
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() && first_data_line.is_none() {
            first_data_line = Some(trimmed.to_string());
        }
    }

    match first_data_line {
        Some(line) if line.contains(',') => Ok(FileKind::Pairs),
        Some(_) => Ok(FileKind::Values),
        None => bail!("{} is empty", path.display()),
    }
}

fn stem_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Timing series loader
// ---------------------------------------------------------------------------

/// Load a newline-delimited numeric series. A first line that does not parse
/// as a number is treated as a header and skipped; any later malformed line
/// is an error.
pub fn load_series(path: &Path) -> Result<Series> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut values = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("{}: line {}", path.display(), line_no + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) if line_no == 0 => {
                log::debug!("{}: skipping header line {trimmed:?}", path.display());
            }
            Err(_) => bail!(
                "{}: line {}: {:?} is not a number",
                path.display(),
                line_no + 1,
                trimmed
            ),
        }
    }

    Ok(Series::from_values(stem_name(path), values, SeriesStyle::Line))
}

// ---------------------------------------------------------------------------
// Indexed pair loader
// ---------------------------------------------------------------------------

/// Load a headerless two-column CSV: column 0 is the x index, column 1 the
/// measured value.
pub fn load_pairs(path: &Path) -> Result<Series> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("{}: row {}", path.display(), row_no + 1))?;
        if record.len() < 2 {
            bail!(
                "{}: row {}: expected 2 columns, got {}",
                path.display(),
                row_no + 1,
                record.len()
            );
        }
        let xi: f64 = record[0]
            .trim()
            .parse()
            .with_context(|| format!("{}: row {}: bad index", path.display(), row_no + 1))?;
        let yi: f64 = record[1]
            .trim()
            .parse()
            .with_context(|| format!("{}: row {}: bad value", path.display(), row_no + 1))?;
        x.push(xi);
        y.push(yi);
    }

    Ok(Series::new(stem_name(path), x, y, SeriesStyle::Line)?)
}

// ---------------------------------------------------------------------------
// Commit log loader
// ---------------------------------------------------------------------------

/// Scan a node log for `created by commit` lines and extract the object
/// count each one reports. The counts come out indexed by commit number,
/// 1..=n, drawn as a step chart.
pub fn load_commit_log(path: &Path) -> Result<Series> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut counts = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("{}: line {}", path.display(), line_no + 1))?;
        if !line.contains(COMMIT_MARKER) {
            continue;
        }
        let mut rev = line.split_whitespace().rev();
        rev.next();
        let token = rev.next().with_context(|| {
            format!(
                "{}: line {}: no object count on marker line",
                path.display(),
                line_no + 1
            )
        })?;
        let count: i64 = token.parse().with_context(|| {
            format!(
                "{}: line {}: object count {:?} is not an integer",
                path.display(),
                line_no + 1,
                token
            )
        })?;
        counts.push(count as f64);
    }

    let x = (1..=counts.len()).map(|i| i as f64).collect();
    Ok(Series::new(stem_name(path), x, counts, SeriesStyle::Step)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct JsonSeries {
    name: String,
    y: Vec<f64>,
    #[serde(default)]
    x: Option<Vec<f64>>,
}

/// Load pre-digested series from a JSON array of records. `x` defaults to
/// row position when absent.
pub fn load_json(path: &Path) -> Result<Vec<Series>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<JsonSeries> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut series = Vec::with_capacity(records.len());
    for rec in records {
        let s = match rec.x {
            Some(x) => Series::new(rec.name, x, rec.y, SeriesStyle::Line)?,
            None => Series::from_values(rec.name, rec.y, SeriesStyle::Line),
        };
        series.push(s);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn series_loader_skips_header_and_names_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "completed_times_master", "completed\n0.5\n1.25\n2.0\n");
        let s = load_series(&path).unwrap();
        assert_eq!(s.name, "completed_times_master");
        assert_eq!(s.y, vec![0.5, 1.25, 2.0]);
        assert_eq!(s.x, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn series_loader_reports_the_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "times", "1.0\n2.0\nbogus\n");
        let err = load_series(&path).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn pair_loader_reads_index_and_value_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "visit_level", "10,1\n20,3\n35,2\n");
        let s = load_pairs(&path).unwrap();
        assert_eq!(s.x, vec![10.0, 20.0, 35.0]);
        assert_eq!(s.y, vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn pair_loader_rejects_single_column_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad", "10,1\n20\n");
        assert!(load_pairs(&path).is_err());
    }

    #[test]
    fn commit_log_extracts_counts_including_freezes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "node.log",
            "starting up\n\
             store: created by commit: 153 objects\n\
             validator: block 1 done\n\
             store: created by commit: 0 objects\n\
             store: created by commit: 97 objects\n",
        );
        let s = load_commit_log(&path).unwrap();
        assert_eq!(s.y, vec![153.0, 0.0, 97.0]);
        assert_eq!(s.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.style, SeriesStyle::Step);
    }

    #[test]
    fn commit_log_rejects_marker_line_without_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "node.log", "created by commit weirdness\n");
        assert!(load_commit_log(&path).is_err());
    }

    #[test]
    fn json_loader_defaults_x_to_row_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "series.json",
            r#"[{"name":"a","y":[1.0,2.0]},{"name":"b","y":[5.0],"x":[10.0]}]"#,
        );
        let series = load_json(&path).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].x, vec![0.0, 1.0]);
        assert_eq!(series[1].x, vec![10.0]);
    }

    #[test]
    fn load_file_dispatches_on_content() {
        let dir = tempfile::tempdir().unwrap();
        let values = write_file(&dir, "times", "1.0\n2.0\n");
        let pairs = write_file(&dir, "pairs", "1,2\n3,4\n");
        let log = write_file(&dir, "node.log", "x: created by commit: 5 objects\n");

        assert_eq!(load_file(&values).unwrap()[0].style, SeriesStyle::Line);
        assert_eq!(load_file(&pairs).unwrap()[0].x, vec![1.0, 3.0]);
        assert_eq!(load_file(&log).unwrap()[0].y, vec![5.0]);
    }

    #[test]
    fn load_file_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty", "");
        assert!(load_file(&path).is_err());
    }
}
