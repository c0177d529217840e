pub mod alert;
pub mod chat_area;
pub mod input_bar;
pub mod login_form;
pub mod register_form;
pub mod room_list;
