pub mod error_panel;
pub mod header;
pub mod loading_panel;
pub mod preview_panel;
pub mod result_panel;
pub mod upload_area;
