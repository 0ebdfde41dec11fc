//! Command handlers

pub mod geocode;
pub mod session;

pub use geocode::handle_geocode_command;
pub use session::handle_session_command;
