use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::export;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – series toggles and reshape controls
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Series");
    ui.separator();

    let Some(sheet) = &state.sheet else {
        ui.label("No data loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let names = sheet.names.clone();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.show_all();
        }
        if ui.small_button("None").clicked() {
            state.hide_all();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in &names {
                let mut shown = !state.hidden.contains(name);

                let mut text = RichText::new(name);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(name));
                }

                if ui.checkbox(&mut shown, text).changed() {
                    state.toggle_series(name);
                }
            }

            ui.separator();
            ui.strong("Reshape");

            let mut limited = state.head_limit.is_some();
            if ui.checkbox(&mut limited, "Limit rows").changed() {
                state.head_limit = if limited { Some(1000) } else { None };
            }
            if let Some(n) = &mut state.head_limit {
                ui.add(DragValue::new(n).range(1..=1_000_000).speed(10));
            }

            ui.checkbox(&mut state.drop_freezes, "Drop zero rows");
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export PNG…").clicked() {
                export_png_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Close All").clicked() {
                *state = AppState::default();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(sheet) = &state.sheet {
            ui.label(format!(
                "{} series loaded, {} visible",
                sheet.len(),
                state.visible_indices.len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.minmax_scaling, "Min-Max Scaling")
            .clicked()
        {
            state.minmax_scaling = !state.minmax_scaling;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open benchmark logs")
        .add_filter("Benchmark logs", &["csv", "log", "txt", "json"])
        .add_filter("All files", &["*"])
        .pick_files();

    let Some(paths) = files else { return };

    state.loading = true;
    for path in paths {
        match crate::data::loader::load_file(&path) {
            Ok(series) => {
                log::info!(
                    "loaded {} series from {}",
                    series.len(),
                    path.display()
                );
                state.add_series(series);
            }
            Err(e) => {
                log::error!("failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

pub fn export_png_dialog(state: &mut AppState) {
    if state.sheet.is_none() {
        state.status_message = Some("Nothing to export".to_string());
        return;
    }

    let file = rfd::FileDialog::new()
        .set_title("Export chart as PNG")
        .add_filter("PNG image", &["png"])
        .set_file_name("chart.png")
        .save_file();

    let Some(path) = file else { return };
    let Some(colors) = &state.color_map else { return };

    match export::save_png(
        &state.shaped_visible(),
        &state.figure,
        colors,
        &path,
        export::DEFAULT_SIZE,
    ) {
        Ok(()) => {
            log::info!("exported chart to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("failed to export chart: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
