//! ISO 3166-1 alpha-2 country codes attached to substations.

use crate::error::{CtgError, CtgResult};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Two-letter upper-case country code (`FR`, `BE`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    pub fn new(code: &str) -> CtgResult<Self> {
        let trimmed = code.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CtgError::Configuration(format!(
                "invalid country code '{code}'; expected two ASCII letters"
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl FromStr for Country {
    type Err = CtgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::new(s)
    }
}

impl TryFrom<String> for Country {
    type Error = CtgError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Country::new(&value)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Country allow-set. Insertion order is kept so generated scripts list
/// countries the way the filter author entered them.
pub type CountrySet = IndexSet<Country>;

/// Build a [`CountrySet`] from codes, rejecting the first malformed one.
pub fn country_set<I, S>(codes: I) -> CtgResult<CountrySet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .map(|code| Country::new(code.as_ref()))
        .collect()
}
