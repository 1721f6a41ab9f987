use std::collections::BTreeMap;

use super::model::{Series, SeriesStyle, ShapeError};

// ---------------------------------------------------------------------------
// Row-level reshaping
// ---------------------------------------------------------------------------

/// Keep only the first `n` points.
pub fn head(series: &Series, n: usize) -> Series {
    let n = n.min(series.len());
    Series {
        name: series.name.clone(),
        x: series.x[..n].to_vec(),
        y: series.y[..n].to_vec(),
        style: series.style,
    }
}

/// Drop freeze rows: points whose measured value is zero.
pub fn drop_freezes(series: &Series) -> Series {
    let mut x = Vec::with_capacity(series.len());
    let mut y = Vec::with_capacity(series.len());
    for (&xi, &yi) in series.x.iter().zip(series.y.iter()) {
        if yi != 0.0 {
            x.push(xi);
            y.push(yi);
        }
    }
    Series {
        name: series.name.clone(),
        x,
        y,
        style: series.style,
    }
}

/// Replace the x axis with consecutive positions starting at `start`.
pub fn reindex(series: &Series, start: f64) -> Series {
    let x = (0..series.len()).map(|i| start + i as f64).collect();
    Series {
        name: series.name.clone(),
        x,
        y: series.y.clone(),
        style: series.style,
    }
}

/// Running total.
pub fn cumsum(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|v| {
            total += v;
            total
        })
        .collect()
}

/// Re-index `counts` by the running total of `times`: point i sits at the
/// cumulative time of the first i+1 entries. Both series must have the same
/// number of rows.
pub fn with_cumulative_index(counts: &Series, times: &Series) -> Result<Series, ShapeError> {
    if counts.len() != times.len() {
        return Err(ShapeError::UnequalLength {
            left: counts.name.clone(),
            right: times.name.clone(),
            left_len: counts.len(),
            right_len: times.len(),
        });
    }
    Ok(Series {
        name: counts.name.clone(),
        x: cumsum(&times.y),
        y: counts.y.clone(),
        style: counts.style,
    })
}

/// Scale values into [0, 1]. A constant series maps to all-zero.
pub fn minmax_scale(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range.abs() < f64::EPSILON {
        return vec![0.0; values.len()];
    }
    values.iter().map(|&v| (v - min) / range).collect()
}

// ---------------------------------------------------------------------------
// Outer merge on a shared integer index
// ---------------------------------------------------------------------------

/// Result of an outer join of two pair-series on their integer index.
#[derive(Debug, Clone)]
pub struct Merged {
    pub index: Vec<i64>,
    pub left: Vec<Option<f64>>,
    pub right: Vec<Option<f64>>,
}

/// Outer-join two series on their x values rounded to integers. The union
/// index comes out sorted ascending; a key present on only one side leaves a
/// hole on the other. Duplicate keys within one side keep the last value.
pub fn merge_outer(left: &Series, right: &Series) -> Merged {
    let mut rows: BTreeMap<i64, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for (&xi, &yi) in left.x.iter().zip(left.y.iter()) {
        rows.entry(xi.round() as i64).or_default().0 = Some(yi);
    }
    for (&xi, &yi) in right.x.iter().zip(right.y.iter()) {
        rows.entry(xi.round() as i64).or_default().1 = Some(yi);
    }

    let mut merged = Merged {
        index: Vec::with_capacity(rows.len()),
        left: Vec::with_capacity(rows.len()),
        right: Vec::with_capacity(rows.len()),
    };
    for (key, (l, r)) in rows {
        merged.index.push(key);
        merged.left.push(l);
        merged.right.push(r);
    }
    merged
}

impl Merged {
    /// The left value column over the union index, holes as NaN gaps.
    pub fn left_series(&self, name: impl Into<String>, style: SeriesStyle) -> Series {
        Self::column(&self.index, &self.left, name, style)
    }

    /// The right value column over the union index, holes as NaN gaps.
    pub fn right_series(&self, name: impl Into<String>, style: SeriesStyle) -> Series {
        Self::column(&self.index, &self.right, name, style)
    }

    fn column(
        index: &[i64],
        values: &[Option<f64>],
        name: impl Into<String>,
        style: SeriesStyle,
    ) -> Series {
        Series {
            name: name.into(),
            x: index.iter().map(|&i| i as f64).collect(),
            y: values.iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
            style,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart geometry helpers shared by both render backends
// ---------------------------------------------------------------------------

/// Split a series into contiguous runs of finite points, breaking at NaN
/// gaps, so lines are not drawn across missing values.
pub fn gap_segments(x: &[f64], y: &[f64]) -> Vec<Vec<[f64; 2]>> {
    debug_assert_eq!(x.len(), y.len());
    let mut segments = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        if yi.is_nan() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push([xi, yi]);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Expand points into a step polyline: each value is held constant to the
/// left of its x position (matplotlib's default `where='pre'`).
pub fn step_expand(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let mut out = Vec::with_capacity(points.len().saturating_mul(2));
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push([points[i - 1][0], p[1]]);
        }
        out.push(*p);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SeriesStyle;

    fn series(x: Vec<f64>, y: Vec<f64>) -> Series {
        Series::new("t", x, y, SeriesStyle::Line).unwrap()
    }

    #[test]
    fn head_truncates_and_tolerates_short_input() {
        let s = series(vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0]);
        let h = head(&s, 2);
        assert_eq!(h.x, vec![0.0, 1.0]);
        assert_eq!(h.y, vec![10.0, 11.0]);
        assert_eq!(head(&s, 100).len(), 3);
    }

    #[test]
    fn drop_freezes_removes_zero_rows_with_their_index() {
        let s = series(vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 0.0, 7.0, 0.0]);
        let kept = drop_freezes(&s);
        assert_eq!(kept.x, vec![1.0, 3.0]);
        assert_eq!(kept.y, vec![5.0, 7.0]);
    }

    #[test]
    fn reindex_renumbers_from_start() {
        let s = series(vec![4.0, 9.0, 10.0], vec![1.0, 2.0, 3.0]);
        assert_eq!(reindex(&s, 1.0).x, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn cumsum_accumulates() {
        assert_eq!(cumsum(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
        assert!(cumsum(&[]).is_empty());
    }

    #[test]
    fn cumulative_index_requires_equal_lengths() {
        let counts = series(vec![1.0, 2.0], vec![10.0, 20.0]);
        let times = series(vec![0.0, 1.0], vec![0.5, 1.5]);
        let s = with_cumulative_index(&counts, &times).unwrap();
        assert_eq!(s.x, vec![0.5, 2.0]);
        assert_eq!(s.y, vec![10.0, 20.0]);

        let short = series(vec![0.0], vec![0.5]);
        assert!(with_cumulative_index(&counts, &short).is_err());
    }

    #[test]
    fn minmax_scales_into_unit_range() {
        assert_eq!(minmax_scale(&[2.0, 4.0, 6.0]), vec![0.0, 0.5, 1.0]);
        assert_eq!(minmax_scale(&[3.0, 3.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn merge_outer_joins_on_integer_index() {
        let left = series(vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0]);
        let right = series(vec![1.0, 5.0], vec![0.5, 0.9]);
        let merged = merge_outer(&left, &right);
        assert_eq!(merged.index, vec![0, 1, 2, 5]);
        assert_eq!(merged.left, vec![Some(10.0), Some(11.0), Some(12.0), None]);
        assert_eq!(merged.right, vec![None, Some(0.5), None, Some(0.9)]);

        let l = merged.left_series("l", SeriesStyle::Line);
        assert_eq!(l.x, vec![0.0, 1.0, 2.0, 5.0]);
        assert!(l.y[3].is_nan());

        let r = merged.right_series("r", SeriesStyle::Line);
        assert!(r.y[0].is_nan());
        assert_eq!(r.y[1], 0.5);
    }

    #[test]
    fn gap_segments_break_at_nan() {
        let segs = gap_segments(
            &[0.0, 1.0, 2.0, 3.0, 4.0],
            &[1.0, 2.0, f64::NAN, 4.0, 5.0],
        );
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], vec![[0.0, 1.0], [1.0, 2.0]]);
        assert_eq!(segs[1], vec![[3.0, 4.0], [4.0, 5.0]]);
    }

    #[test]
    fn step_expand_holds_values_left_of_each_x() {
        let steps = step_expand(&[[0.0, 1.0], [2.0, 3.0]]);
        assert_eq!(steps, vec![[0.0, 1.0], [0.0, 3.0], [2.0, 3.0]]);
    }
}
