use eframe::egui;

use crate::common::types::capitalize;
use crate::common::{ChatParams, Room};
use crate::ui::state::RoomDirectory;

/// One entry of the room directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomButton {
    pub label: String,
    pub target: ChatParams,
}

pub fn room_buttons(rooms: &[Room]) -> Vec<RoomButton> {
    rooms
        .iter()
        .map(|room| RoomButton {
            label: capitalize(&room.name),
            target: ChatParams::new(room.id.clone(), room.name.clone()),
        })
        .collect()
}

#[derive(Default)]
pub struct RoomListActions {
    pub open: Option<ChatParams>,
    pub logout: bool,
}

pub fn render(ui: &mut egui::Ui, directory: &RoomDirectory) -> RoomListActions {
    let mut actions = RoomListActions::default();

    ui.horizontal(|ui| {
        ui.heading("Rooms");
        if ui.button("Log out").clicked() {
            actions.logout = true;
        }
    });
    ui.separator();

    if directory.loading {
        ui.spinner();
        return actions;
    }

    for button in room_buttons(&directory.rooms) {
        if ui.button(&button.label).clicked() {
            actions.open = Some(button.target);
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::RoomList;

    #[test]
    fn listing_becomes_capitalised_buttons() {
        let listing: RoomList = serde_json::from_str(
            r#"{"rooms":[{"id":"1","name":"general"},{"id":"2","name":"music"}]}"#,
        )
        .unwrap();
        let buttons = room_buttons(&listing.into_rooms());

        let labels: Vec<&str> = buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["General", "Music"]);

        let targets: Vec<String> = buttons.iter().map(|b| b.target.to_query()).collect();
        assert_eq!(targets, vec![
            "chat.html?room=1&name=general",
            "chat.html?room=2&name=music",
        ]);
    }

    #[test]
    fn empty_listing_renders_nothing() {
        assert!(room_buttons(&[]).is_empty());
    }
}
