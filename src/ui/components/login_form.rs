use eframe::egui;

use crate::ui::state::LoginForm;

#[derive(Default)]
pub struct LoginActions {
    pub submit: bool,
    pub go_register: bool,
}

pub fn render(ui: &mut egui::Ui, form: &mut LoginForm) -> LoginActions {
    let mut actions = LoginActions::default();

    ui.heading("Log in");
    ui.separator();

    egui::Grid::new("login_form").num_columns(2).show(ui, |ui| {
        ui.label("Email");
        ui.text_edit_singleline(&mut form.email);
        ui.end_row();

        ui.label("Password");
        let response = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            actions.submit = true;
        }
        ui.end_row();
    });

    ui.horizontal(|ui| {
        if ui.add_enabled(!form.pending, egui::Button::new("Log in")).clicked() {
            actions.submit = true;
        }
        if form.pending {
            ui.spinner();
        }
    });

    ui.separator();
    if ui.link("No account yet? Register").clicked() {
        actions.go_register = true;
    }

    actions.submit &= !form.pending;
    actions
}
