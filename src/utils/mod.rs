//! Utility functions module

use crate::error::{Error, Result};
use reqwest::Client;
use std::time::Duration;

/// HTTP client builder
pub struct HttpClientBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: default_user_agent(),
        }
    }
}

/// User-Agent sent when none is configured
#[must_use]
pub fn default_user_agent() -> String {
    format!("JSerInfoMCP/{}", crate::VERSION)
}

impl HttpClientBuilder {
    /// Create a new HTTP client builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout
    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Set User-Agent
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build HTTP client
    pub fn build(self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| Error::Initialization(format!("Failed to build HTTP client: {e}")))
    }
}

/// Timestamp utilities
pub mod time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

    /// Lower bound used as the begin date of the first week
    #[must_use]
    pub fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    /// Parse an upstream or user supplied timestamp.
    ///
    /// Accepts RFC 3339 (`2011-01-20T13:20:00.000Z`, `2025-04-17T23:41:52+09:00`),
    /// naive date-times read as UTC, and bare `YYYY-MM-DD` dates (UTC midnight).
    #[must_use]
    pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Some(naive.and_utc());
            }
        }

        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Format as `YYYY-MM-DDTHH:MM:SS.mmmZ`
    #[must_use]
    pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Serde adapter writing `DateTime<Utc>` in the millisecond `Z` form
    pub mod iso_millis {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize
        pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&super::format_timestamp(dt))
        }

        /// Deserialize
        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
            let raw = String::deserialize(deserializer)?;
            super::parse_timestamp(&raw)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
        }
    }
}

/// Validation utilities
pub mod validation {
    use crate::error::Error;

    /// Validate an absolute http(s) URL
    pub fn validate_url(raw: &str) -> Result<url::Url, Error> {
        let parsed = url::Url::parse(raw)
            .map_err(|e| Error::Validation(format!("invalid URL '{raw}': {e}")))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(Error::Validation(format!(
                "unsupported URL scheme '{other}' in '{raw}'"
            ))),
        }
    }

    /// Validate a pair of range bounds, naming every bound that fails to parse
    pub fn validate_date_range(
        begin: &str,
        end: &str,
    ) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>), Error> {
        match (super::time::parse_timestamp(begin), super::time::parse_timestamp(end)) {
            (Some(b), Some(e)) => Ok((b, e)),
            (None, Some(_)) => Err(Error::Validation(format!("invalid beginDate '{begin}'"))),
            (Some(_), None) => Err(Error::Validation(format!("invalid endDate '{end}'"))),
            (None, None) => Err(Error::Validation(format!(
                "invalid beginDate '{begin}' and endDate '{end}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::time::{format_timestamp, parse_timestamp};
    use super::validation::{validate_date_range, validate_url};

    #[test]
    fn test_parse_timestamp_formats() {
        let z = parse_timestamp("2011-01-20T13:20:00.000Z").unwrap();
        assert_eq!(format_timestamp(&z), "2011-01-20T13:20:00.000Z");

        let offset = parse_timestamp("2011-01-18T20:53:04+09:00").unwrap();
        assert_eq!(format_timestamp(&offset), "2011-01-18T11:53:04.000Z");

        let date_only = parse_timestamp("2014-01-01").unwrap();
        assert_eq!(format_timestamp(&date_only), "2014-01-01T00:00:00.000Z");

        let naive = parse_timestamp("2014-01-01T09:30:00").unwrap();
        assert_eq!(format_timestamp(&naive), "2014-01-01T09:30:00.000Z");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2014-13-01").is_none());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://jser.info/").is_ok());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_validate_date_range_names_bad_bound() {
        let err = validate_date_range("2014-01-01", "soon").unwrap_err();
        assert!(err.to_string().contains("soon"));
        assert!(!err.to_string().contains("beginDate"));

        let err = validate_date_range("then", "soon").unwrap_err();
        assert!(err.to_string().contains("then"));
        assert!(err.to_string().contains("soon"));
    }
}
