use eframe::egui;

/// Message field plus Send button. Returns true when the user submitted;
/// whether anything is actually sent is up to the session.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) -> bool {
    let mut submit = false;
    ui.horizontal(|ui| {
        let response = ui.text_edit_singleline(input_text);
        if ui.button("Send").clicked() {
            submit = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
            response.request_focus();
        }
    });
    submit
}
