use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day in local time, as a canonical `YYYY-MM-DD` string.
///
/// The store never validates keys it is handed; use [`DateKey::parse`] at the
/// boundary where user input enters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Wraps a key as-is.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn today() -> Self {
        Self::from(Local::now().date_naive())
    }

    /// Parse user input and normalize it to zero-padded form.
    pub fn parse(input: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(input.trim(), DATE_KEY_FORMAT)
            .map_err(|_| anyhow!("Invalid date format. Use YYYY-MM-DD"))?;
        Ok(Self::from(date))
    }

    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, DATE_KEY_FORMAT).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date.format(DATE_KEY_FORMAT).to_string())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
