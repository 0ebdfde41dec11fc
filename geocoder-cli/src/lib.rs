//! Batch geocoding of address spreadsheets
//!
//! An uploaded workbook with `address1`, `city`, `sta` and `zip` columns is
//! geocoded row by row against the Google Maps Geocoding API and written back
//! out with `Latitude` and `Longitude` columns appended. Access is gated by a
//! shared secret.
//!
//! - [`shell::Session`] ties the pieces together for one user session
//! - [`geocode::process`] is the sequential batch loop
//! - [`api::GeocodingClient`] performs a single lookup
//! - [`workbook`] reads uploads and writes results

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod geocode;
pub mod shell;
pub mod workbook;
