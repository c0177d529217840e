use eframe::egui;

use crate::ui::state::RegisterForm;

#[derive(Default)]
pub struct RegisterActions {
    pub submit: bool,
    pub go_login: bool,
}

pub fn render(ui: &mut egui::Ui, form: &mut RegisterForm) -> RegisterActions {
    let mut actions = RegisterActions::default();

    ui.heading("Register");
    ui.separator();

    egui::Grid::new("register_form").num_columns(2).show(ui, |ui| {
        ui.label("Username");
        ui.text_edit_singleline(&mut form.username);
        ui.end_row();

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
        if ui.add_enabled(!form.pending, egui::Button::new("Create account")).clicked() {
            actions.submit = true;
        }
        if form.pending {
            ui.spinner();
        }
    });

    ui.separator();
    if ui.link("Already registered? Log in").clicked() {
        actions.go_login = true;
    }

    actions.submit &= !form.pending;
    actions
}
