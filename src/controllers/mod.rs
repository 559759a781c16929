pub mod json;
pub mod lead_controller;
pub mod quote_controller;
pub mod settings_controller;
