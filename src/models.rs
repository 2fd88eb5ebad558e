//! Telemetry sample models for the energy monitor.
//!
//! A [`RawSample`] is one entry of a ThingSpeak channel feed, exactly as the
//! device published it. Every field is optional and loosely typed, so
//! conversion into a [`ParsedSample`] never fails: unusable values coerce to
//! zero and the relay status coerces to OFF.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde_json::Value;

// ---

/// Raw feed entry from the telemetry channel.
///
/// Field mapping on the wire: `field1` voltage, `field2` current, `field3`
/// power, `field4` cumulative energy (kWh), `field5` temperature (°C),
/// `field6` relay status (0 = OFF, 1 = ON).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSample {
    // ---
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(rename = "field1", default)]
    pub voltage: Option<Value>,
    #[serde(rename = "field2", default)]
    pub current: Option<Value>,
    #[serde(rename = "field3", default)]
    pub power: Option<Value>,
    #[serde(rename = "field4", default)]
    pub energy: Option<Value>,
    #[serde(rename = "field5", default)]
    pub temperature: Option<Value>,
    #[serde(rename = "field6", default)]
    pub relay_status: Option<Value>,
}

/// Validated, typed form of a [`RawSample`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSample {
    // ---
    /// Timestamp exactly as received; used for charts and day bucketing.
    pub timestamp: String,
    /// Parsed instant, `None` when the timestamp is not an ISO-8601 date-time.
    pub recorded_at: Option<DateTime<FixedOffset>>,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    /// Cumulative counter, not a per-interval delta.
    pub energy: f64,
    pub temperature: f64,
    /// Always 0 or 1.
    pub relay_status: u8,
}

impl RawSample {
    // ---
    /// Coerce every field into its typed form. Never fails.
    pub fn to_parsed(&self) -> ParsedSample {
        // ---
        let timestamp = timestamp_text(self.created_at.as_ref());
        let recorded_at = parse_instant(&timestamp);

        ParsedSample {
            recorded_at,
            voltage: coerce_f64(self.voltage.as_ref()),
            current: coerce_f64(self.current.as_ref()),
            power: coerce_f64(self.power.as_ref()),
            energy: coerce_f64(self.energy.as_ref()),
            temperature: coerce_f64(self.temperature.as_ref()),
            relay_status: coerce_relay(self.relay_status.as_ref()),
            timestamp,
        }
    }
}

impl ParsedSample {
    // ---
    pub fn relay_on(&self) -> bool {
        self.relay_status == 1
    }

    /// Calendar date portion of the timestamp (text before `T`).
    pub fn date_key(&self) -> &str {
        // ---
        self.timestamp
            .split_once('T')
            .map_or(self.timestamp.as_str(), |(date, _)| date)
    }
}

// ---

/// Offset-less date-time layouts, read as UTC.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Strings are kept verbatim, other scalars use their JSON text.
fn timestamp_text(value: Option<&Value>) -> String {
    // ---
    match value {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// RFC 3339 first, then `+hhmm` offsets, then naive date-times and bare
/// dates in UTC.
fn parse_instant(text: &str) -> Option<DateTime<FixedOffset>> {
    // ---
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at);
    }
    if let Ok(at) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(at);
    }

    let naive = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    FixedOffset::east_opt(0).map(|utc| utc.from_utc_datetime(&naive))
}

/// Numbers pass through, strings contribute their longest numeric prefix,
/// everything else (and any non-finite result) becomes 0.
fn coerce_f64(value: Option<&Value>) -> f64 {
    // ---
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => leading_float(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Only an integer value of exactly 1 means ON.
fn coerce_relay(value: Option<&Value>) -> u8 {
    // ---
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|v| v.trunc() as i64)),
        Some(Value::String(s)) => leading_int(s),
        _ => None,
    };
    u8::from(parsed == Some(1))
}

fn leading_float(text: &str) -> Option<f64> {
    // ---
    let text = text.trim();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    end += count_digits(&bytes[end..]);
    let mut digits = end - digits_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction = count_digits(&bytes[end + 1..]);
        digits += fraction;
        end += 1 + fraction;
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}

pub(crate) fn leading_int(text: &str) -> Option<i64> {
    // ---
    let text = text.trim();
    let bytes = text.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    text[..sign + digits].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
