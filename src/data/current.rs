//! Current-conditions snapshot

use super::fields;
use super::payload::NormalizedPayload;
use super::{as_code, as_number, CurrentWeatherData, Strictness, StructuralMismatch};

/// Reads the `current*` scalars from the payload.
///
/// Missing or non-numeric fields become `None` unless `strictness` is
/// [`Strictness::Strict`], in which case they are reported.
pub fn extract_current(
    payload: &NormalizedPayload,
    strictness: Strictness,
) -> Result<CurrentWeatherData, StructuralMismatch> {
    if strictness == Strictness::Strict {
        if let Some(name) = fields::CURRENT
            .iter()
            .find(|&&name| payload.scalar(name).and_then(|v| v.as_f64()).is_none())
        {
            return Err(StructuralMismatch::MissingField(name.to_string()));
        }
    }

    Ok(CurrentWeatherData {
        temperature: payload.scalar(fields::CURRENT_TEMP).and_then(as_number),
        apparent_temperature: payload.scalar(fields::CURRENT_APP_TEMP).and_then(as_number),
        weather_code: payload.scalar(fields::CURRENT_WEATHER_CODE).and_then(as_code),
        wind_speed: payload.scalar(fields::CURRENT_WIND_SPEED).and_then(as_number),
    })
}
