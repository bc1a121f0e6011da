// Timestamp normalization for history service readings
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::environment::{Reading, Sample};

const FRACTIONAL_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f";
const WHOLE_SECONDS_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("unparseable timestamp: {0:?}")]
    UnparseableTimestamp(String),
}

/// Parse a single UTC timestamp, fractional layout first, whole seconds as fallback
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, TimeError> {
    let cleaned = raw.trim().replacen('T', " ", 1);
    let cleaned = cleaned.strip_suffix('Z').unwrap_or(&cleaned);

    let naive = NaiveDateTime::parse_from_str(cleaned, FRACTIONAL_LAYOUT)
        .or_else(|_| NaiveDateTime::parse_from_str(cleaned, WHOLE_SECONDS_LAYOUT))
        .map_err(|_| TimeError::UnparseableTimestamp(raw.to_string()))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Convert UTC timestamps into `target`, keeping order and count.
///
/// Fails on the first timestamp that matches neither layout; nothing is returned
/// for a partially parseable batch.
pub fn normalize<S: AsRef<str>>(timestamps: &[S], target: Tz) -> Result<Vec<DateTime<Tz>>, TimeError> {
    timestamps
        .iter()
        .map(|raw| parse_utc(raw.as_ref()).map(|utc| utc.with_timezone(&target)))
        .collect()
}

pub fn to_samples(readings: &[Reading], target: Tz) -> Result<Vec<Sample>, TimeError> {
    let timestamps = normalize(
        &readings.iter().map(|r| r.recv_time.as_str()).collect::<Vec<_>>(),
        target,
    )?;

    Ok(timestamps
        .into_iter()
        .zip(readings)
        .map(|(timestamp, reading)| Sample {
            timestamp,
            value: reading.value,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, Timelike};
    use chrono_tz::America::Sao_Paulo;

    #[test]
    fn test_parse_fractional_seconds() {
        let parsed = parse_utc("2024-01-01T12:00:00.250Z").unwrap();
        assert_eq!(parsed.hour(), 12);
        assert_eq!(parsed.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_parse_whole_seconds() {
        let parsed = parse_utc("2024-01-01T12:00:05Z").unwrap();
        assert_eq!(parsed.second(), 5);
        assert_eq!(parsed.nanosecond(), 0);

        // Already space separated, no zone suffix
        let parsed = parse_utc("2024-01-01 12:00:05").unwrap();
        assert_eq!(parsed.second(), 5);
    }

    #[test]
    fn test_normalize_to_sao_paulo() {
        let converted = normalize(&["2024-01-01T12:00:00.000Z"], Sao_Paulo).unwrap();
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].hour(), 9);
        assert_eq!(converted[0].offset().fix().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_normalize_preserves_order_and_count() {
        let input = [
            "2024-03-05T10:00:02Z",
            "2024-03-05T10:00:00.5Z",
            "2024-03-05T10:00:01Z",
        ];
        let converted = normalize(&input, Sao_Paulo).unwrap();
        assert_eq!(converted.len(), 3);

        let back: Vec<DateTime<Utc>> = converted.iter().map(|t| t.with_timezone(&Utc)).collect();
        let expected: Vec<DateTime<Utc>> = input.iter().map(|s| parse_utc(s).unwrap()).collect();
        assert_eq!(back, expected);
    }

    #[test]
    fn test_unparseable_timestamp_fails_batch() {
        let result = normalize(&["2024-01-01T12:00:00Z", "yesterday"], Sao_Paulo);
        assert_eq!(
            result,
            Err(TimeError::UnparseableTimestamp("yesterday".to_string()))
        );

        assert!(parse_utc("2024-01-01").is_err());
        assert!(parse_utc("2024-13-01T12:00:00Z").is_err());
    }

    #[test]
    fn test_to_samples_pairs_values() {
        let readings = vec![
            Reading::new("2024-01-01T12:00:00.000Z", 23.5),
            Reading::new("2024-01-01T12:00:10.000Z", 24.0),
        ];
        let samples = to_samples(&readings, Sao_Paulo).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].value, 24.0);
        assert_eq!(samples[1].timestamp.second(), 10);
    }
}
