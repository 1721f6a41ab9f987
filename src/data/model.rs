use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ShapeError – the one structural invariant the data layer enforces
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("series '{name}': x has {x_len} values but y has {y_len}")]
    Mismatched {
        name: String,
        x_len: usize,
        y_len: usize,
    },
    #[error("'{left}' has {left_len} rows but '{right}' has {right_len}")]
    UnequalLength {
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
    },
}

// ---------------------------------------------------------------------------
// Series – one plotted line
// ---------------------------------------------------------------------------

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStyle {
    Line,
    Step,
    Points,
}

/// A single named series. `x` and `y` always have the same length; a gap in
/// the data is a `f64::NAN` entry in `y`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub style: SeriesStyle,
}

impl Series {
    pub fn new(
        name: impl Into<String>,
        x: Vec<f64>,
        y: Vec<f64>,
        style: SeriesStyle,
    ) -> Result<Self, ShapeError> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(ShapeError::Mismatched {
                name,
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Series { name, x, y, style })
    }

    /// A series indexed by row position, 0..n.
    pub fn from_values(name: impl Into<String>, y: Vec<f64>, style: SeriesStyle) -> Self {
        let x = (0..y.len()).map(|i| i as f64).collect();
        Series {
            name: name.into(),
            x,
            y,
            style,
        }
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Largest finite value, if any.
    pub fn y_max(&self) -> Option<f64> {
        self.y
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// Sum of the finite values.
    pub fn y_sum(&self) -> f64 {
        self.y.iter().copied().filter(|v| v.is_finite()).sum()
    }
}

// ---------------------------------------------------------------------------
// SeriesSheet – the complete loaded collection
// ---------------------------------------------------------------------------

/// Everything currently loaded, plus the ordered list of series names used
/// by the side panel and the color map.
#[derive(Debug, Clone, Default)]
pub struct SeriesSheet {
    pub series: Vec<Series>,
    pub names: Vec<String>,
}

impl SeriesSheet {
    pub fn from_series(series: Vec<Series>) -> Self {
        let mut sheet = SeriesSheet::default();
        for s in series {
            sheet.push(s);
        }
        sheet
    }

    pub fn push(&mut self, series: Series) {
        if !self.names.contains(&series.name) {
            self.names.push(series.name.clone());
        }
        self.series.push(series);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FigureSpec – caption and axis labels
// ---------------------------------------------------------------------------

/// Chart decorations shared by the viewer and the PNG renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FigureSpec {
    pub title: Option<String>,
    pub x_desc: String,
    pub y_desc: String,
}

impl FigureSpec {
    pub fn new(
        title: Option<String>,
        x_desc: impl Into<String>,
        y_desc: impl Into<String>,
    ) -> Self {
        FigureSpec {
            title,
            x_desc: x_desc.into(),
            y_desc: y_desc.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_lengths() {
        let err = Series::new("a", vec![1.0, 2.0], vec![1.0], SeriesStyle::Line).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::Mismatched {
                x_len: 2,
                y_len: 1,
                ..
            }
        ));
    }

    #[test]
    fn from_values_indexes_by_position() {
        let s = Series::from_values("a", vec![5.0, 6.0, 7.0], SeriesStyle::Line);
        assert_eq!(s.x, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn sheet_collects_names_in_order_without_duplicates() {
        let sheet = SeriesSheet::from_series(vec![
            Series::from_values("b", vec![1.0], SeriesStyle::Line),
            Series::from_values("a", vec![2.0], SeriesStyle::Line),
            Series::from_values("b", vec![3.0], SeriesStyle::Line),
        ]);
        assert_eq!(sheet.names, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(sheet.len(), 3);
        assert!(!sheet.is_empty());
        assert!(SeriesSheet::default().is_empty());
        assert!(!sheet.series[0].is_empty());
    }

    #[test]
    fn y_stats_skip_gaps() {
        let s = Series::new(
            "a",
            vec![0.0, 1.0, 2.0],
            vec![1.0, f64::NAN, 3.0],
            SeriesStyle::Line,
        )
        .unwrap();
        assert_eq!(s.y_max(), Some(3.0));
        assert_eq!(s.y_sum(), 4.0);
    }
}
