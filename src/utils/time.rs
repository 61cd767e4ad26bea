// src/utils/time.rs

use chrono::{NaiveDateTime, Utc};

use crate::config::TIMESTAMP_FORMAT;

/// Current UTC time in the store's timestamp format.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now().naive_utc())
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
}
