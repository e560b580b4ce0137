//! Fund and decêndio vocabulary.
//!
//! `Fund` and `Decendio` serialize to the exact strings the extract service
//! expects in request bodies (`"fpm"`, `"royalties"`, `"1°"`, …).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Fund covered by the extract service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fund {
    Fpm,
    Royalties,
}

impl Fund {
    /// Wire value sent in the `tipo` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Fund::Fpm => "fpm",
            Fund::Royalties => "royalties",
        }
    }
}

impl fmt::Display for Fund {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fund {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fpm" => Ok(Fund::Fpm),
            "royalties" => Ok(Fund::Royalties),
            other => Err(CoreError::InvalidFund(other.to_owned())),
        }
    }
}

/// Ten-day segment of a month used by the date-range extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decendio {
    #[serde(rename = "1°")]
    Primeiro,
    #[serde(rename = "2°")]
    Segundo,
    #[serde(rename = "3°")]
    Terceiro,
}

impl Decendio {
    /// Wire value sent in the `decendio` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Decendio::Primeiro => "1°",
            Decendio::Segundo => "2°",
            Decendio::Terceiro => "3°",
        }
    }
}

impl fmt::Display for Decendio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decendio {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "1°" => Ok(Decendio::Primeiro),
            "2" | "2°" => Ok(Decendio::Segundo),
            "3" | "3°" => Ok(Decendio::Terceiro),
            other => Err(CoreError::InvalidDecendio(other.to_owned())),
        }
    }
}
