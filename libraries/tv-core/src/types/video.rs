/// Video domain type
use serde::{Deserialize, Deserializer, Serialize};

/// Duration used when the real one is unknown (keeps progress ratios finite)
const UNKNOWN_DURATION_SECS: u64 = 1;

/// A single playable video
///
/// Immutable once fetched. `duration_seconds` is never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// YouTube video ID
    pub id: String,

    /// Video title
    #[serde(default)]
    pub title: String,

    /// Duration in whole seconds (at least 1)
    #[serde(
        default = "unknown_duration",
        alias = "duration",
        deserialize_with = "deserialize_duration"
    )]
    pub duration_seconds: u64,
}

impl Video {
    /// Create a video; a zero duration is treated as unknown
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_seconds: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_seconds: duration_seconds.max(UNKNOWN_DURATION_SECS),
        }
    }

    /// Parse an ISO-8601 duration as returned by the YouTube Data API
    ///
    /// Accepts `P[nD]T[nH][nM][nS]`. Anything unparsable, or a total of
    /// zero, yields 1 second.
    pub fn parse_iso8601_duration(value: &str) -> u64 {
        parse_iso8601(value)
            .filter(|secs| *secs > 0)
            .unwrap_or(UNKNOWN_DURATION_SECS)
    }
}

fn parse_iso8601(value: &str) -> Option<u64> {
    let rest = value.trim().strip_prefix('P')?;
    let (date_part, time_part) = rest.split_once('T')?;

    let mut total = 0u64;

    if !date_part.is_empty() {
        let days = date_part.strip_suffix('D')?.parse::<u64>().ok()?;
        total = days.checked_mul(86_400)?;
    }

    let mut digits = String::new();
    let mut last_unit = 0u8;
    for ch in time_part.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        let (rank, multiplier) = match ch {
            'H' => (1, 3_600),
            'M' => (2, 60),
            'S' => (3, 1),
            _ => return None,
        };
        // Units must appear in H, M, S order, each at most once
        if rank <= last_unit || digits.is_empty() {
            return None;
        }
        last_unit = rank;
        let secs = digits.parse::<u64>().ok()?.checked_mul(multiplier)?;
        total = total.checked_add(secs)?;
        digits.clear();
    }

    if !digits.is_empty() {
        return None;
    }

    Some(total)
}

fn unknown_duration() -> u64 {
    UNKNOWN_DURATION_SECS
}

/// Accepts plain seconds (integer or float) or an ISO-8601 string
fn deserialize_duration<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(f64),
        Iso(String),
        Missing(()),
    }

    let secs = match RawDuration::deserialize(deserializer)? {
        RawDuration::Seconds(value) if value.is_finite() && value >= 1.0 => value.floor() as u64,
        RawDuration::Iso(text) => Video::parse_iso8601_duration(&text),
        _ => UNKNOWN_DURATION_SECS,
    };

    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_becomes_one() {
        assert_eq!(Video::new("a", "A", 0).duration_seconds, 1);
    }

    #[test]
    fn parses_full_iso_duration() {
        assert_eq!(Video::parse_iso8601_duration("P1DT2H3M4S"), 86_400 + 7_200 + 180 + 4);
        assert_eq!(Video::parse_iso8601_duration("PT4M13S"), 253);
        assert_eq!(Video::parse_iso8601_duration("PT45S"), 45);
        assert_eq!(Video::parse_iso8601_duration("PT1H"), 3_600);
    }

    #[test]
    fn unparsable_iso_duration_is_one() {
        assert_eq!(Video::parse_iso8601_duration(""), 1);
        assert_eq!(Video::parse_iso8601_duration("garbage"), 1);
        assert_eq!(Video::parse_iso8601_duration("PT"), 1);
        assert_eq!(Video::parse_iso8601_duration("PT0S"), 1);
        assert_eq!(Video::parse_iso8601_duration("PT3S4M"), 1);
        assert_eq!(Video::parse_iso8601_duration("P300000000000000DT"), 1);
        assert_eq!(Video::parse_iso8601_duration("P1DT18446744073709551615S"), 1);
        assert_eq!(Video::parse_iso8601_duration("PT99999999999999999999H"), 1);
    }

    #[test]
    fn deserializes_numeric_and_iso_durations() {
        let numeric: Video =
            serde_json::from_str(r#"{"id":"a","title":"A","durationSeconds":212.7}"#).unwrap();
        assert_eq!(numeric.duration_seconds, 212);

        let legacy: Video =
            serde_json::from_str(r#"{"id":"b","title":"B","duration":"PT2M"}"#).unwrap();
        assert_eq!(legacy.duration_seconds, 120);

        let missing: Video = serde_json::from_str(r#"{"id":"c"}"#).unwrap();
        assert_eq!(missing.duration_seconds, 1);
        assert_eq!(missing.title, "");

        let null: Video = serde_json::from_str(r#"{"id":"d","duration":null}"#).unwrap();
        assert_eq!(null.duration_seconds, 1);
    }
}
