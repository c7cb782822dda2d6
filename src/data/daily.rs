//! Daily record builder
//!
//! Slices a normalized payload into one [`DailyWeatherData`] per entry of the
//! `dates` field. Daily scalars are read by day index; hourly values are read as
//! the contiguous window `[day * 24, day * 24 + 24)` of each hourly field.

use serde_json::Value;

use super::fields;
use super::payload::NormalizedPayload;
use super::{
    as_code, as_number, as_token, DailyWeatherData, Strictness, StructuralMismatch,
    HOURS_PER_DAY,
};

/// Builds one record per day, in the order of `dates`.
///
/// In [`Strictness::Lenient`] mode this never fails: absent or empty `dates`
/// yields no records, short hourly fields yield short windows for trailing days
/// and absent daily values become `None`. In [`Strictness::Strict`] mode every
/// daily field must hold exactly `D` entries and every hourly field `D * 24`.
pub fn build_daily_records(
    payload: &NormalizedPayload,
    strictness: Strictness,
) -> Result<Vec<DailyWeatherData>, StructuralMismatch> {
    let dates = payload.sequence(fields::DATES);

    if strictness == Strictness::Strict {
        let dates =
            dates.ok_or_else(|| StructuralMismatch::MissingField(fields::DATES.to_string()))?;
        check_shape(payload, dates.len())?;
    }

    let Some(dates) = dates else {
        return Ok(Vec::new());
    };

    let column = |name: &str| payload.sequence(name).unwrap_or(&[]);
    let daily_code = column(fields::DAILY_WEATHER_CODE);
    let daily_max = column(fields::DAILY_MAX_TEMP);
    let daily_min = column(fields::DAILY_MIN_TEMP);
    let sunrise = column(fields::DAILY_SUNRISE);
    let sunset = column(fields::DAILY_SUNSET);
    let uv_index = column(fields::DAILY_UV_INDEX);

    let hourly_temp = column(fields::HOURLY_TEMP);
    let hourly_app_temp = column(fields::HOURLY_APP_TEMP);
    let hourly_prec_prob = column(fields::HOURLY_PREC_PROB);
    let hourly_code = column(fields::HOURLY_WEATHER_CODE);
    let hourly_wind = column(fields::HOURLY_WIND_SPEED);

    let records = dates
        .iter()
        .enumerate()
        .map(|(day, date)| DailyWeatherData {
            date: as_token(date).unwrap_or_default(),
            hourly_temp: window(hourly_temp, day, as_number),
            hourly_app_temp: window(hourly_app_temp, day, as_number),
            hourly_prec_prob: window(hourly_prec_prob, day, as_number),
            hourly_weather_code: window(hourly_code, day, as_code),
            hourly_wind_speed: window(hourly_wind, day, as_number),
            daily_weather_code: daily_code.get(day).and_then(as_code),
            daily_max_temp: daily_max.get(day).and_then(as_number),
            daily_min_temp: daily_min.get(day).and_then(as_number),
            daily_sunrise: sunrise.get(day).and_then(as_token),
            daily_sunset: sunset.get(day).and_then(as_token),
            daily_uv_index: uv_index.get(day).and_then(as_number),
        })
        .collect();

    Ok(records)
}

/// Returns the hourly window for `day`, truncated at the end of `values`
pub fn hourly_window(values: &[Value], day: usize) -> &[Value] {
    let start = (day * HOURS_PER_DAY).min(values.len());
    let end = (start + HOURS_PER_DAY).min(values.len());
    &values[start..end]
}

fn window<T>(values: &[Value], day: usize, read: fn(&Value) -> Option<T>) -> Vec<Option<T>> {
    hourly_window(values, day).iter().map(read).collect()
}

fn check_shape(payload: &NormalizedPayload, days: usize) -> Result<(), StructuralMismatch> {
    let expectations = fields::DAILY
        .iter()
        .map(|&name| (name, days))
        .chain(fields::HOURLY.iter().map(|&name| (name, days * HOURS_PER_DAY)));

    for (name, expected) in expectations {
        let values = payload
            .sequence(name)
            .ok_or_else(|| StructuralMismatch::MissingField(name.to_string()))?;
        if values.len() != expected {
            tracing::warn!(field = name, expected, actual = values.len(), "payload shape mismatch");
            return Err(StructuralMismatch::LengthMismatch {
                field: name.to_string(),
                expected,
                actual: values.len(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::payload::RawPayload;
    use serde_json::json;

    fn normalized(value: Value) -> NormalizedPayload {
        RawPayload::from_value(value).unwrap().normalize()
    }

    fn range(start: u32, end: u32) -> Vec<f64> {
        (start..end).map(f64::from).collect()
    }

    fn full_payload(days: usize) -> Value {
        let hours = (days * HOURS_PER_DAY) as u32;
        let dates: Vec<String> = (1..=days).map(|d| format!("2024-01-{:02}", d)).collect();
        json!({
            "dates": dates,
            "dailyWeatherCode": vec![3; days],
            "dailyMaxTemp": range(10, 10 + days as u32),
            "dailyMinTemp": range(0, days as u32),
            "dailySunrise": vec!["07:45"; days],
            "dailySunset": vec!["16:30"; days],
            "dailyUVIndex": vec![1.5; days],
            "hourlyTemp": range(0, hours),
            "hourlyAppTemp": range(0, hours),
            "hourlyPrecProb": vec![20; days * HOURS_PER_DAY],
            "hourlyWeatherCode": vec![61; days * HOURS_PER_DAY],
            "hourlyWindSpeed": vec![12.0; days * HOURS_PER_DAY],
        })
    }

    #[test]
    fn test_two_day_payload_slices_windows() {
        let payload = normalized(json!({
            "dates": ["2024-01-01", "2024-01-02"],
            "dailyMaxTemp": [10, 12],
            "hourlyTemp": range(0, 48),
        }));

        let records = build_daily_records(&payload, Strictness::Lenient).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2024-01-01");
        assert_eq!(records[0].daily_max_temp, Some(10.0));
        assert_eq!(records[1].daily_max_temp, Some(12.0));
        let expected: Vec<Option<f64>> = range(24, 48).into_iter().map(Some).collect();
        assert_eq!(records[1].hourly_temp, expected);
    }

    #[test]
    fn test_windows_concatenate_to_original_sequence() {
        let payload = normalized(full_payload(5));
        let records = build_daily_records(&payload, Strictness::Lenient).unwrap();

        assert_eq!(records.len(), 5);
        let joined: Vec<Option<f64>> = records
            .iter()
            .flat_map(|r| r.hourly_temp.iter().copied())
            .collect();
        let original: Vec<Option<f64>> = range(0, 120).into_iter().map(Some).collect();
        assert_eq!(joined, original);
        assert!(records.iter().all(|r| r.hourly_temp.len() == HOURS_PER_DAY));
    }

    #[test]
    fn test_short_hourly_field_truncates_trailing_day() {
        let payload = normalized(json!({
            "dates": ["2024-01-01", "2024-01-02"],
            "hourlyTemp": range(0, 30),
        }));

        let records = build_daily_records(&payload, Strictness::Lenient).unwrap();

        assert_eq!(records[0].hourly_temp.len(), 24);
        assert_eq!(records[1].hourly_temp.len(), 6);
        assert_eq!(records[1].hourly_temp[0], Some(24.0));
    }

    #[test]
    fn test_missing_hourly_field_is_empty() {
        let payload = normalized(json!({"dates": ["2024-01-01"]}));
        let records = build_daily_records(&payload, Strictness::Lenient).unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].hourly_wind_speed.is_empty());
        assert!(records[0].daily_sunrise.is_none());
    }

    #[test]
    fn test_absent_or_empty_dates_yields_no_records() {
        let absent = normalized(json!({"hourlyTemp": range(0, 24)}));
        assert!(build_daily_records(&absent, Strictness::Lenient).unwrap().is_empty());

        let empty = normalized(json!({"dates": []}));
        assert!(build_daily_records(&empty, Strictness::Lenient).unwrap().is_empty());
    }

    #[test]
    fn test_keyed_fields_are_sliced_like_arrays() {
        let mut keyed = serde_json::Map::new();
        for i in 0..48u32 {
            keyed.insert(i.to_string(), json!(i));
        }
        let payload = normalized(json!({
            "dates": {"0": "2024-01-01", "1": "2024-01-02"},
            "hourlyTemp": keyed,
        }));

        let records = build_daily_records(&payload, Strictness::Lenient).unwrap();

        assert_eq!(records[1].date, "2024-01-02");
        assert_eq!(records[1].hourly_temp[0], Some(24.0));
        assert_eq!(records[1].hourly_temp[23], Some(47.0));
    }

    #[test]
    fn test_null_entries_stay_aligned() {
        let mut temps: Vec<Value> = range(0, 24).into_iter().map(|t| json!(t)).collect();
        temps[5] = Value::Null;
        let payload = normalized(json!({"dates": ["2024-01-01"], "hourlyTemp": temps}));

        let records = build_daily_records(&payload, Strictness::Lenient).unwrap();

        assert_eq!(records[0].hourly_temp.len(), 24);
        assert_eq!(records[0].hourly_temp[5], None);
        assert_eq!(records[0].hourly_temp[6], Some(6.0));
    }

    #[test]
    fn test_daily_scalars_are_read_by_index() {
        let payload = normalized(full_payload(3));
        let records = build_daily_records(&payload, Strictness::Lenient).unwrap();

        assert_eq!(records[2].daily_max_temp, Some(12.0));
        assert_eq!(records[2].daily_min_temp, Some(2.0));
        assert_eq!(records[2].daily_weather_code, Some(3));
        assert_eq!(records[2].daily_sunrise.as_deref(), Some("07:45"));
        assert_eq!(records[2].daily_sunset.as_deref(), Some("16:30"));
        assert_eq!(records[2].daily_uv_index, Some(1.5));
        assert_eq!(records[2].hourly_weather_code[0], Some(61));
        assert_eq!(records[2].hourly_prec_prob[0], Some(20.0));
    }

    #[test]
    fn test_strict_accepts_consistent_payload() {
        let payload = normalized(full_payload(2));
        let records = build_daily_records(&payload, Strictness::Strict).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_strict_rejects_short_hourly_field() {
        let mut value = full_payload(2);
        value["hourlyTemp"] = json!(range(0, 30));
        let payload = normalized(value);

        let result = build_daily_records(&payload, Strictness::Strict);

        assert_eq!(
            result,
            Err(StructuralMismatch::LengthMismatch {
                field: "hourlyTemp".to_string(),
                expected: 48,
                actual: 30,
            })
        );
    }

    #[test]
    fn test_strict_rejects_missing_field() {
        let mut value = full_payload(1);
        value.as_object_mut().unwrap().remove("dailySunset");
        let payload = normalized(value);

        let result = build_daily_records(&payload, Strictness::Strict);

        assert_eq!(
            result,
            Err(StructuralMismatch::MissingField("dailySunset".to_string()))
        );
    }

    #[test]
    fn test_strict_requires_dates() {
        let payload = normalized(json!({}));
        assert_eq!(
            build_daily_records(&payload, Strictness::Strict),
            Err(StructuralMismatch::MissingField("dates".to_string()))
        );
    }

    #[test]
    fn test_hourly_window_bounds() {
        let values: Vec<Value> = (0..30).map(|i| json!(i)).collect();
        assert_eq!(hourly_window(&values, 0).len(), 24);
        assert_eq!(hourly_window(&values, 1).len(), 6);
        assert!(hourly_window(&values, 2).is_empty());
    }
}
