//! Lookup error type.

use thiserror::Error;

/// Which of the two provider endpoints a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "weather",
            Self::Forecast => "forecast",
        }
    }

    /// Message used when the provider rejects a request without saying why
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Self::Current => "City not found. Please check the city name and try again.",
            Self::Forecast => "Forecast data not found",
        }
    }
}

/// Failure of a weather lookup.
///
/// `Display` is the text shown to the user; it never carries transport
/// internals (those are logged instead).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success status; `message` is the provider's text when it sent one.
    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Failed to fetch {} data. Please try again later.", .endpoint.label())]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid {} data format", .endpoint.label())]
    InvalidData { endpoint: Endpoint, detail: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Text surfaced verbatim to the error banner.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Status code reported by the provider, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}
