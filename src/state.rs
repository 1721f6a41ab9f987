use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::data::model::{FigureSpec, Series, SeriesSheet};
use crate::data::transform;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded series (None until the user loads a file).
    pub sheet: Option<SeriesSheet>,

    /// Caption and axis labels for the current view.
    pub figure: FigureSpec,

    /// Names of series currently hidden in the side panel.
    pub hidden: BTreeSet<String>,

    /// Indices of series passing the visibility toggles (cached).
    pub visible_indices: Vec<usize>,

    /// Keep only the first N rows of every series, when set.
    pub head_limit: Option<usize>,

    /// Drop freeze rows (zero-valued measurements) before plotting.
    pub drop_freezes: bool,

    /// Scale every series into [0, 1] before plotting.
    pub minmax_scaling: bool,

    /// Active colour map.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sheet: None,
            figure: FigureSpec::default(),
            hidden: BTreeSet::new(),
            visible_indices: Vec::new(),
            head_limit: None,
            drop_freezes: false,
            minmax_scaling: false,
            color_map: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Replace the loaded sheet, resetting visibility and colours.
    pub fn set_sheet(&mut self, sheet: SeriesSheet) {
        self.hidden.clear();
        self.visible_indices = (0..sheet.len()).collect();
        self.color_map = Some(ColorMap::new(&sheet.names));
        self.sheet = Some(sheet);
        self.status_message = None;
        self.loading = false;
    }

    /// Append newly loaded series to the current sheet.
    pub fn add_series(&mut self, series: Vec<Series>) {
        let mut sheet = self.sheet.take().unwrap_or_default();
        for s in series {
            sheet.push(s);
        }
        self.set_sheet(sheet);
    }

    /// Recompute `visible_indices` after a visibility change.
    pub fn refresh_visible(&mut self) {
        if let Some(sheet) = &self.sheet {
            self.visible_indices = sheet
                .series
                .iter()
                .enumerate()
                .filter(|(_, s)| !self.hidden.contains(&s.name))
                .map(|(i, _)| i)
                .collect();
        }
    }

    /// Toggle a single series in the side panel.
    pub fn toggle_series(&mut self, name: &str) {
        if !self.hidden.remove(name) {
            self.hidden.insert(name.to_string());
        }
        self.refresh_visible();
    }

    /// Show every series.
    pub fn show_all(&mut self) {
        self.hidden.clear();
        self.refresh_visible();
    }

    /// Hide every series.
    pub fn hide_all(&mut self) {
        if let Some(sheet) = &self.sheet {
            self.hidden = sheet.names.iter().cloned().collect();
        }
        self.refresh_visible();
    }

    /// The visible series with the reshape toggles applied, ready to draw.
    /// Both the egui chart and the PNG exporter consume this.
    pub fn shaped_visible(&self) -> Vec<Series> {
        let Some(sheet) = &self.sheet else {
            return Vec::new();
        };
        self.visible_indices
            .iter()
            .map(|&idx| {
                let mut s = sheet.series[idx].clone();
                if let Some(n) = self.head_limit {
                    s = transform::head(&s, n);
                }
                if self.drop_freezes {
                    s = transform::drop_freezes(&s);
                }
                if self.minmax_scaling {
                    s.y = transform::minmax_scale(&s.y);
                }
                s
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SeriesStyle;

    fn sheet() -> SeriesSheet {
        SeriesSheet::from_series(vec![
            Series::from_values("a", vec![1.0, 0.0, 3.0], SeriesStyle::Line),
            Series::from_values("b", vec![4.0, 5.0, 6.0], SeriesStyle::Line),
        ])
    }

    #[test]
    fn toggling_a_series_hides_it() {
        let mut state = AppState::default();
        state.set_sheet(sheet());
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.toggle_series("a");
        assert_eq!(state.visible_indices, vec![1]);
        state.toggle_series("a");
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn shaped_visible_applies_reshape_toggles() {
        let mut state = AppState::default();
        state.set_sheet(sheet());
        state.head_limit = Some(2);
        state.drop_freezes = true;

        let shaped = state.shaped_visible();
        assert_eq!(shaped.len(), 2);
        // 'a' loses its freeze row after truncation to two rows
        assert_eq!(shaped[0].y, vec![1.0]);
        assert_eq!(shaped[1].y, vec![4.0, 5.0]);
    }

    #[test]
    fn adding_series_keeps_the_existing_ones() {
        let mut state = AppState::default();
        state.set_sheet(sheet());
        state.add_series(vec![Series::from_values(
            "c",
            vec![9.0],
            SeriesStyle::Points,
        )]);
        let sheet = state.sheet.as_ref().unwrap();
        assert_eq!(sheet.names, vec!["a", "b", "c"]);
        assert_eq!(state.visible_indices.len(), 3);
    }
}
