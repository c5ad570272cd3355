//! Text helpers for weather cards.

use crate::types::{CurrentReport, ForecastDay, ForecastReport};

/// Forecast cards never show more than this many days
pub const MAX_FORECAST_CARDS: usize = 5;

const NOT_AVAILABLE: &str = "N/A";

/// Whole-degree Celsius, e.g. `23°C`.
pub fn format_temp_c(value: f64) -> String {
    if value.is_finite() {
        format!("{}°C", value.round() as i64)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

pub fn format_temp_f(value: f64) -> String {
    if value.is_finite() {
        format!("{}°F", value.round() as i64)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

fn format_with_unit(value: f64, unit: &str) -> String {
    if value.is_finite() {
        format!("{}{}", trim_number(value), unit)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Drop a trailing `.0` so integral readings print as integers
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

pub fn format_humidity(value: f64) -> String {
    format_with_unit(value, "%")
}

pub fn format_wind(kph: f64) -> String {
    format_with_unit(kph, " kph")
}

pub fn format_visibility(km: f64) -> String {
    format_with_unit(km, " km")
}

/// Display text for a condition, falling back to `N/A` for blank text
pub fn condition_text(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE
    } else {
        trimmed
    }
}

/// Short weekday for a forecast row, e.g. `Mon`
pub fn weekday_label(day: &ForecastDay) -> String {
    day.date.format("%a").to_string()
}

/// The days shown on forecast cards
pub fn forecast_cards(report: &ForecastReport) -> &[ForecastDay] {
    let days = report.days();
    &days[..days.len().min(MAX_FORECAST_CARDS)]
}

/// Multi-line summary of current conditions
pub fn current_card(report: &CurrentReport) -> String {
    let current = &report.current;
    let mut heading = report.location.name.clone();
    if !report.location.country.is_empty() {
        heading.push_str(", ");
        heading.push_str(&report.location.country);
    }

    format!(
        "{heading}\n  {temp} ({temp_f}), feels like {feels}\n  {icon} {condition}\n  Humidity {humidity}  Wind {wind}  Visibility {vis}\n  Updated {updated}",
        temp = format_temp_c(current.temp_c),
        temp_f = format_temp_f(current.temp_f),
        feels = format_temp_c(current.feelslike_c),
        icon = current.condition.kind().icon_name(),
        condition = condition_text(&current.condition.text),
        humidity = format_humidity(current.humidity),
        wind = format_wind(current.wind_kph),
        vis = format_visibility(current.vis_km),
        updated = current.last_updated,
    )
}

/// One line per forecast day
pub fn forecast_lines(report: &ForecastReport) -> Vec<String> {
    forecast_cards(report)
        .iter()
        .map(|day| {
            format!(
                "{}  {} / {}  {}  UV {}  {} mm",
                weekday_label(day),
                format_temp_c(day.day.maxtemp_c),
                format_temp_c(day.day.mintemp_c),
                condition_text(&day.day.condition.text),
                trim_number(day.day.uv),
                trim_number(day.day.totalprecip_mm),
            )
        })
        .collect()
}
