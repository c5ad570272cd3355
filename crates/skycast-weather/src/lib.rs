//! Weather data for SkyCast
//!
//! Wraps the WeatherAPI.com current-conditions and forecast endpoints and
//! provides the text helpers used to render weather cards.

pub mod client;
pub mod display;
pub mod error;
pub mod types;

pub use client::{FetchClient, ProviderSettings, WeatherLookup};
pub use error::{Endpoint, FetchError};
pub use types::*;
