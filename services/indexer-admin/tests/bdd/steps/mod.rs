//! BDD step definitions for the indexer admin dashboard

pub mod alert_steps;
pub mod dashboard_steps;
pub mod delete_steps;
pub mod import_export_steps;
pub mod table_steps;
