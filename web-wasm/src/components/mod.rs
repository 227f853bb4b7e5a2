pub mod action_buttons;
pub mod error_banner;
pub mod header;
pub mod result_panel;
pub mod upload_area;
