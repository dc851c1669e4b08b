use crate::errors::{Error, Result, MISSING_FIELDS};
use crate::model::{CreateReading, NewReading, ReadingFilter, ReadingsQuery, DEFAULT_LIMIT};
use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;

const INVALID_LIMIT: &str = "Parâmetro limite inválido";

/// Validates a POST body and coerces it into a reading ready to persist.
///
/// Missing, `null`, `false` and empty-string fields count as absent, as does
/// a zero `dispositivo`. Zero is a legitimate measurement and is accepted.
/// Timestamps are kept to millisecond precision, the store's resolution.
pub fn validate(body: CreateReading) -> Result<NewReading> {
    let (Some(temperature), Some(humidity), Some(device)) = (
        present(body.temperature),
        present(body.humidity),
        present(body.device).filter(|device| !is_zero(device)),
    ) else {
        return Err(Error::validation(MISSING_FIELDS));
    };

    let temperature = coerce_number("temperatura", &temperature)?;
    let humidity = coerce_number("umidade", &humidity)?;
    let device = coerce_device(&device)?;

    let timestamp = match present(body.timestamp) {
        Some(value) => coerce_timestamp(&value)?,
        None => Utc::now(),
    }
    .trunc_subsecs(3);

    Ok(NewReading {
        temperature,
        humidity,
        device,
        timestamp,
    })
}

/// Builds the store filter and effective page size for a GET request.
pub fn validate_query(query: &ReadingsQuery, max_limit: u32) -> Result<(ReadingFilter, u32)> {
    let limit = parse_limit(query.limit.as_deref(), max_limit)?;
    let device = query
        .device
        .as_deref()
        .filter(|device| !device.is_empty())
        .map(str::to_string);

    Ok((ReadingFilter { device }, limit))
}

/// Absent or empty means the default page size; larger values are clamped.
pub fn parse_limit(raw: Option<&str>, max_limit: u32) -> Result<u32> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_LIMIT.min(max_limit)),
        Some(raw) => raw,
    };

    let limit: u64 = raw.parse().map_err(|_| Error::validation(INVALID_LIMIT))?;
    if limit == 0 {
        return Err(Error::validation(INVALID_LIMIT));
    }

    Ok(limit.min(u64::from(max_limit)) as u32)
}

fn present(value: Option<Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        other => other,
    }
}

fn is_zero(value: &Value) -> bool {
    value.as_f64() == Some(0.0)
}

fn coerce_number(field: &str, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(Error::validation(format!("Campo {} deve ser numérico", field))),
    }
}

fn coerce_device(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::validation("Campo dispositivo deve ser texto")),
    }
}

fn coerce_timestamp(value: &Value) -> Result<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::validation("Campo timestamp deve estar no formato RFC 3339"))
}
