use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("🔍 Filters");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.button("🚪 Logout").clicked() {
                state.logout();
            }
        });
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                dimension_filter(ui, state, dim);
            }
        });
}

/// One collapsible multi-select with All / None buttons.
fn dimension_filter(ui: &mut Ui, state: &mut AppState, dim: Dimension) {
    // Clone what we need so we can mutate state inside the loop.
    let dims = state.data.dimensions.clone();
    let n_total = match dim {
        Dimension::FiscalYear => dims.years.len(),
        Dimension::Quarter => dims.quarters.len(),
        Dimension::VehicleCategory => dims.categories.len(),
    };
    let n_selected = state.selection.selected_count(dim);
    let header_text = format!("{}  ({n_selected}/{n_total})", dim.label());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(dim.label())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dim);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(dim);
                }
            });

            match dim {
                Dimension::FiscalYear => {
                    for &year in &dims.years {
                        let mut checked = state.selection.years.contains(&year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            state.toggle_year(year);
                        }
                    }
                }
                Dimension::Quarter => {
                    for quarter in &dims.quarters {
                        let mut checked = state.selection.quarters.contains(quarter);
                        if ui.checkbox(&mut checked, quarter.as_str()).changed() {
                            state.toggle_quarter(quarter);
                        }
                    }
                }
                Dimension::VehicleCategory => {
                    for category in &dims.categories {
                        let mut checked = state.selection.categories.contains(category);
                        if ui.checkbox(&mut checked, category.as_str()).changed() {
                            state.toggle_category(category);
                        }
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export view…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let data = &state.data;
        ui.label(format!(
            "{} maker rows, {} state rows, {} charging locations",
            data.makers.len(),
            data.states.len(),
            data.infrastructure.len()
        ))
        .on_hover_text(state.config.data_dir.display().to_string());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open EV data folder")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        if let Err(e) = state.reload_from(&dir) {
            log::error!("Failed to load data folder: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let default_name = format!("{}.json", state.view.label().replace([' ', '&'], "_"));
    let file = rfd::FileDialog::new()
        .set_title("Export view")
        .set_file_name(default_name)
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_report(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
