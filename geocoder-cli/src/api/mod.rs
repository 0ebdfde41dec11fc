//! Geocoding provider API
//!
//! A thin client for the Google Maps Geocoding API and the [`Geocoder`] seam
//! the batch processor is written against.

pub mod client;
pub mod models;

pub use client::{DEFAULT_GEOCODE_URL, GeocodeError, Geocoder, GeocodingClient, LookupOutcome};
pub use models::{Coordinates, GeocodeResponse, GeocodeResult};
