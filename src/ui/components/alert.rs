use eframe::egui;

/// Blocking-style notice window; cleared when dismissed.
pub fn render(ctx: &egui::Context, alert: &mut Option<String>) {
    let Some(message) = alert.as_deref() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        *alert = None;
    }
}
