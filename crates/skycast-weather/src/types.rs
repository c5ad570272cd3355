use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from WeatherAPI condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl ConditionKind {
    /// Convert a WeatherAPI condition code to a ConditionKind
    /// See: https://www.weatherapi.com/docs/weather_conditions.json
    pub fn from_code(code: i32) -> Self {
        match code {
            1000 => Self::Clear,
            1003 => Self::PartlyCloudy,
            1006 | 1009 => Self::Cloudy,
            1030 | 1135 | 1147 => Self::Fog,
            1072 | 1150 | 1153 | 1168 | 1171 => Self::Drizzle,
            1063 | 1180 | 1183 | 1186 | 1189 | 1240 => Self::Rain,
            1192 | 1195 | 1243 | 1246 => Self::HeavyRain,
            1069 | 1198 | 1201 | 1204 | 1207 | 1237 | 1249 | 1252 | 1261 | 1264 => Self::Sleet,
            1066 | 1114 | 1117 | 1210 | 1213 | 1216 | 1219 | 1222 | 1225 | 1255 | 1258 => {
                Self::Snow
            }
            1087 | 1273 | 1276 | 1279 | 1282 => Self::Thunderstorm,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Best-effort classification from the provider's condition text,
    /// used when a payload carries no code.
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("thunder") {
            Self::Thunderstorm
        } else if text.contains("sleet") || text.contains("ice pellets") || text.contains("freezing") {
            Self::Sleet
        } else if text.contains("snow") || text.contains("blizzard") {
            Self::Snow
        } else if text.contains("heavy rain") || text.contains("torrential") {
            Self::HeavyRain
        } else if text.contains("drizzle") {
            Self::Drizzle
        } else if text.contains("rain") || text.contains("shower") {
            Self::Rain
        } else if text.contains("fog") || text.contains("mist") {
            Self::Fog
        } else if text.contains("partly") {
            Self::PartlyCloudy
        } else if text.contains("cloud") || text.contains("overcast") {
            Self::Cloudy
        } else {
            Self::Clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Get icon name used by the card renderer
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::Cloudy => "cloud",
            Self::Fog => "cloud_fog",
            Self::Drizzle => "cloud_rain",
            Self::Rain => "cloud_rain",
            Self::HeavyRain => "cloud_rain",
            Self::Snow => "cloud_snow",
            Self::Sleet => "cloud_snow",
            Self::Thunderstorm => "cloud_lightning",
        }
    }
}

/// Condition block shared by current conditions and daily summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        match self.code {
            Some(code) => ConditionKind::from_code(code),
            None => ConditionKind::from_text(&self.text),
        }
    }
}

/// Resolved place as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderLocation {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localtime: Option<String>,
}

/// Current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub humidity: f64,
    pub wind_kph: f64,
    pub vis_km: f64,
    pub feelslike_c: f64,
    pub last_updated: String,
}

/// Body of `current.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReport {
    pub location: ProviderLocation,
    pub current: CurrentConditions,
}

/// Daily aggregate inside a forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub condition: Condition,
    pub uv: f64,
    pub totalprecip_mm: f64,
}

/// One entry of `forecast.forecastday`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DaySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

/// Body of `forecast.json`, reduced to the fields SkyCast keeps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub forecast: Forecast,
}

impl ForecastReport {
    pub fn days(&self) -> &[ForecastDay] {
        &self.forecast.forecastday
    }
}

/// Both lookups for one city, taken from the same invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentReport,
    pub forecast: ForecastReport,
}

impl WeatherSnapshot {
    /// Resolved display name (e.g. "London" for a search of "london uk")
    pub fn display_name(&self) -> &str {
        &self.current.location.name
    }
}

/// Error body returned by the provider on non-success responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProviderErrorBody {
    pub error: Option<ProviderErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProviderErrorDetail {
    #[allow(dead_code)]
    pub code: Option<i64>,
    pub message: Option<String>,
}
