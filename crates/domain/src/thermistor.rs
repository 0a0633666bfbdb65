//! Thermistor conversion for 10-bit ADC temperature sensors.
//!
//! The sensor is a 10 kΩ NTC thermistor in a voltage divider. The raw ADC
//! sample is turned into a resistance and then into an absolute temperature
//! with the Beta equation.

/// Beta coefficient of the thermistor.
pub const BETA: f64 = 3975.0;

/// Largest value a 10-bit ADC can report.
pub const ADC_MAX: u16 = 1023;

/// Nominal thermistor resistance at the reference temperature, in ohms.
pub const NOMINAL_RESISTANCE: f64 = 10_000.0;

/// Reference temperature for [`NOMINAL_RESISTANCE`], in Kelvin (25 °C).
pub const REFERENCE_KELVIN: f64 = 298.15;

/// Convert a raw ADC sample into an absolute temperature in Kelvin.
///
/// Returns `None` for samples the divider cannot produce: `0` divides by
/// zero, [`ADC_MAX`] means zero resistance, and anything above it is out of
/// range.
#[must_use]
pub fn kelvin_from_adc(raw: u16) -> Option<f64> {
    if raw == 0 || raw > ADC_MAX {
        return None;
    }
    let raw = f64::from(raw);
    let resistance = (f64::from(ADC_MAX) - raw) * NOMINAL_RESISTANCE / raw;
    let kelvin = 1.0 / ((resistance / NOMINAL_RESISTANCE).ln() / BETA + 1.0 / REFERENCE_KELVIN);
    (kelvin.is_finite() && kelvin > 0.0).then_some(kelvin)
}
