use std::ops::Range;
use std::path::Path;

use anyhow::{bail, Context, Result};
use plotters::prelude::*;

use crate::color::ColorMap;
use crate::data::model::{FigureSpec, Series, SeriesStyle};
use crate::data::transform;

pub const DEFAULT_SIZE: (u32, u32) = (1280, 720);

// ---------------------------------------------------------------------------
// Headless PNG rendering
// ---------------------------------------------------------------------------

/// Draw the given series to a PNG file. Colors match the viewer's, and each
/// series honors its own style (line, step, point markers).
pub fn save_png(
    series: &[Series],
    figure: &FigureSpec,
    colors: &ColorMap,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let (x_range, y_range) = data_bounds(series)?;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40);
    if let Some(title) = &figure.title {
        builder.caption(title, ("sans-serif", 28));
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    // y-axis grid only
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(figure.x_desc.as_str())
        .y_desc(figure.y_desc.as_str())
        .draw()?;

    for s in series {
        let (r, g, b) = colors.rgb8(&s.name);
        let color = RGBColor(r, g, b);
        let mut labelled = false;

        for segment in transform::gap_segments(&s.x, &s.y) {
            match s.style {
                SeriesStyle::Line => {
                    let anno = chart.draw_series(LineSeries::new(
                        segment.iter().map(|p| (p[0], p[1])),
                        color.stroke_width(2),
                    ))?;
                    if !labelled {
                        anno.label(s.name.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color)
                        });
                        labelled = true;
                    }
                }
                SeriesStyle::Step => {
                    let steps = transform::step_expand(&segment);
                    let anno = chart.draw_series(LineSeries::new(
                        steps.iter().map(|p| (p[0], p[1])),
                        color.stroke_width(2),
                    ))?;
                    if !labelled {
                        anno.label(s.name.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color)
                        });
                        labelled = true;
                    }
                }
                SeriesStyle::Points => {
                    let anno = chart.draw_series(
                        segment
                            .iter()
                            .map(|p| Circle::new((p[0], p[1]), 3, color.filled())),
                    )?;
                    if !labelled {
                        anno.label(s.name.as_str()).legend(move |(x, y)| {
                            Circle::new((x + 10, y), 3, color.filled())
                        });
                        labelled = true;
                    }
                }
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Axis ranges covering every finite point, widened when degenerate.
fn data_bounds(series: &[Series]) -> Result<(Range<f64>, Range<f64>)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for s in series {
        for (&xi, &yi) in s.x.iter().zip(s.y.iter()) {
            if !xi.is_finite() || !yi.is_finite() {
                continue;
            }
            x_min = x_min.min(xi);
            x_max = x_max.max(xi);
            y_min = y_min.min(yi);
            y_max = y_max.max(yi);
        }
    }

    if !x_min.is_finite() || !y_min.is_finite() {
        bail!("nothing to plot");
    }

    Ok((widen(x_min, x_max), widen(y_min, y_max)))
}

fn widen(min: f64, max: f64) -> Range<f64> {
    if (max - min).abs() < f64::EPSILON {
        (min - 0.5)..(max + 0.5)
    } else {
        min..max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Series;

    #[test]
    fn bounds_skip_gaps_and_reject_empty_input() {
        let s = Series::new(
            "a",
            vec![0.0, 1.0, 2.0],
            vec![1.0, f64::NAN, 5.0],
            SeriesStyle::Line,
        )
        .unwrap();
        let (x, y) = data_bounds(&[s]).unwrap();
        assert_eq!(x, 0.0..2.0);
        assert_eq!(y, 1.0..5.0);

        assert!(data_bounds(&[]).is_err());
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        let s = Series::from_values("a", vec![3.0], SeriesStyle::Line);
        let (x, y) = data_bounds(&[s]).unwrap();
        assert_eq!(x, -0.5..0.5);
        assert_eq!(y, 2.5..3.5);
    }

    #[test]
    fn save_png_writes_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        let series = vec![
            Series::from_values("run_a", vec![1.0, 2.0, 4.0, 3.0], SeriesStyle::Line),
            Series::from_values("run_b", vec![2.0, 1.0, 3.0, 5.0], SeriesStyle::Step),
        ];
        let names: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
        let colors = ColorMap::new(&names);
        let figure = FigureSpec::new(Some("Timings".to_string()), "Blocks", "Seconds");

        save_png(&series, &figure, &colors, &path, (320, 240)).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
