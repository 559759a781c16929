pub mod irradiance_service;
pub mod lead_service;
pub mod lead_store;
pub mod quote_calculator;
pub mod quote_session;
