//! UI components

pub mod delete_popup;
pub mod edit_index;
pub mod index_table;
pub mod status_badge;
pub mod toasts;
