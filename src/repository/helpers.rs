//! Row-mapping helpers shared by the repositories.

use chrono::{DateTime, Utc};

/// Treat `QueryReturnedNoRows` as `None` instead of an error.
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Parse an RFC 3339 timestamp column, surfacing a conversion failure as a
/// rusqlite error so it can be raised from inside a row closure.
pub(crate) fn parse_timestamp(value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Decode a JSON column, surfacing a conversion failure as a rusqlite error
/// so it can be raised from inside a row closure.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(value: String) -> rusqlite::Result<T> {
    serde_json::from_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_maps_no_rows_to_none() {
        let hit: std::result::Result<i64, rusqlite::Error> = Ok(42);
        assert_eq!(hit.optional().unwrap(), Some(42));

        let miss: std::result::Result<i64, rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(miss.optional().unwrap(), None);
    }

    #[test]
    fn timestamps_round_trip() {
        let now = Utc::now();
        let parsed = parse_timestamp(now.to_rfc3339()).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn bad_json_is_a_conversion_failure() {
        let result: rusqlite::Result<Vec<String>> = parse_json("not json".to_string());
        assert!(result.is_err());
    }
}
