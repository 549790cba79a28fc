//! Unit conversion and value formatting applied at render time.

use crate::prefs::UnitSystem;

const MPS_PER_MPH: f64 = 0.44704;
const KELVIN_OFFSET: f64 = 273.15;

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn kelvin_to_celsius(k: f64) -> f64 {
    k - KELVIN_OFFSET
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps / MPS_PER_MPH
}

pub fn mph_to_mps(mph: f64) -> f64 {
    mph * MPS_PER_MPH
}

/// Convert a stored Celsius value into the requested unit system.
pub fn temperature(celsius: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => celsius,
        UnitSystem::Imperial => celsius_to_fahrenheit(celsius),
    }
}

/// Convert a stored m/s value into the requested unit system.
pub fn wind_speed(mps: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => mps,
        UnitSystem::Imperial => mps_to_mph(mps),
    }
}

/// Whole degrees with the unit symbol, e.g. `20°C` or `68°F`.
pub fn format_temperature(celsius: f64, units: UnitSystem) -> String {
    format!(
        "{}{}",
        whole(temperature(celsius, units)),
        units.temperature_symbol()
    )
}

/// One decimal with the unit symbol, e.g. `3.4 m/s`.
pub fn format_wind_speed(mps: f64, units: UnitSystem) -> String {
    format!("{:.1} {}", wind_speed(mps, units), units.speed_symbol())
}

/// Probability of precipitation (0..=1) as a whole percentage.
pub fn format_pop(pop: f64) -> String {
    format!("{}%", whole(pop * 100.0))
}

// `format!("{:.0}", -0.2)` prints "-0".
fn whole(value: f64) -> String {
    let rounded = value.round();
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded:.0}")
    }
}
