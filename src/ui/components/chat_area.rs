use eframe::egui;

use crate::chat::ChatLog;

/// Scrollable log. Reports the laid-out geometry back to the log so the
/// next append knows whether the reader is tailing.
pub fn render(ui: &mut egui::Ui, log: &mut ChatLog) {
    let line_height = ui.text_style_height(&egui::TextStyle::Body) + ui.spacing().item_spacing.y;
    let reveal = log.take_reveal();

    let output = egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height(ui.available_height() - 2.0 * line_height)
        .show(ui, |ui| {
            if log.is_empty() {
                ui.weak("No messages yet");
            }
            for line in log.lines() {
                if line.notice {
                    ui.label(egui::RichText::new(&line.text).strong());
                } else {
                    ui.label(&line.text);
                }
            }
            if reveal {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });

    log.observe_viewport(
        output.state.offset.y,
        output.inner_rect.height(),
        output.content_size.y,
        line_height,
    );
}
