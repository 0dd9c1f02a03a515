//! Staffing-domain enums shared by storage and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Seniority level recorded on a professional profile.
///
/// Stored and serialized as its short code (`JR`, `MID`, `SR`, `LEAD`);
/// the human-readable labels are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Seniority {
    #[serde(rename = "JR", alias = "Junior")]
    Junior,
    #[serde(rename = "MID", alias = "Mid")]
    Mid,
    #[serde(rename = "SR", alias = "Senior")]
    Senior,
    #[serde(rename = "LEAD", alias = "Lead")]
    Lead,
}

impl Seniority {
    pub const ALL: [Seniority; 4] = [
        Seniority::Junior,
        Seniority::Mid,
        Seniority::Senior,
        Seniority::Lead,
    ];

    /// Storage code.
    pub fn code(&self) -> &'static str {
        match self {
            Seniority::Junior => "JR",
            Seniority::Mid => "MID",
            Seniority::Senior => "SR",
            Seniority::Lead => "LEAD",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Seniority::Junior => "Junior",
            Seniority::Mid => "Mid",
            Seniority::Senior => "Senior",
            Seniority::Lead => "Lead",
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Seniority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Seniority::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(s) || level.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::Validation(format!(
                    "seniority must be one of JR, MID, SR, LEAD (got '{s}')"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes_and_labels() {
        assert_eq!("JR".parse::<Seniority>().unwrap(), Seniority::Junior);
        assert_eq!("senior".parse::<Seniority>().unwrap(), Seniority::Senior);
        assert_eq!(" lead ".parse::<Seniority>().unwrap(), Seniority::Lead);
        assert!("principal".parse::<Seniority>().is_err());
    }

    #[test]
    fn code_roundtrip() {
        for level in Seniority::ALL {
            assert_eq!(level.code().parse::<Seniority>().unwrap(), level);
        }
    }

    #[test]
    fn serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Seniority::Mid).unwrap(), "\"MID\"");
        let level: Seniority = serde_json::from_str("\"Lead\"").unwrap();
        assert_eq!(level, Seniority::Lead);
    }

    #[test]
    fn display_is_label() {
        assert_eq!(Seniority::Junior.to_string(), "Junior");
    }
}
