use eframe::egui::{self, Color32, Key, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Login gate
// ---------------------------------------------------------------------------

/// Render the centred login card shown until the user signs in.
pub fn login_page(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(ui.available_height() * 0.2);

        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.set_max_width(320.0);
            ui.heading(RichText::new("🔐 EV Dashboard").strong());
            ui.label("Please login to continue");
            ui.add_space(8.0);

            let session = &mut state.session;
            ui.add(
                egui::TextEdit::singleline(&mut session.username)
                    .hint_text("Username")
                    .desired_width(f32::INFINITY),
            );
            let password = ui.add(
                egui::TextEdit::singleline(&mut session.password)
                    .hint_text("Password")
                    .password(true)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);

            let submitted = password.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if ui.button("Login").clicked() || submitted {
                state.try_login();
            }

            if let Some(err) = &state.session.error {
                ui.colored_label(Color32::RED, format!("❌ {err}"));
            }
        });
    });
}
