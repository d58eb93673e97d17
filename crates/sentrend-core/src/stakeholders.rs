//! Stakeholder classification assigned to each article by the classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stakeholder {
    Customer,
    Investor,
    Employee,
    Government,
    Media,
    Partner,
    Competitor,
    Community,
}

impl Stakeholder {
    pub const ALL: [Stakeholder; 8] = [
        Stakeholder::Customer,
        Stakeholder::Investor,
        Stakeholder::Employee,
        Stakeholder::Government,
        Stakeholder::Media,
        Stakeholder::Partner,
        Stakeholder::Competitor,
        Stakeholder::Community,
    ];

    /// The value stored in `stakeholder_type` columns.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Stakeholder::Customer => "customer",
            Stakeholder::Investor => "investor",
            Stakeholder::Employee => "employee",
            Stakeholder::Government => "government",
            Stakeholder::Media => "media",
            Stakeholder::Partner => "partner",
            Stakeholder::Competitor => "competitor",
            Stakeholder::Community => "community",
        }
    }
}

impl fmt::Display for Stakeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stakeholder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| CoreError::InvalidStakeholder(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stakeholder_parses_from_its_stored_value() {
        for st in Stakeholder::ALL {
            assert_eq!(st.as_str().parse::<Stakeholder>().unwrap(), st);
        }
    }

    #[test]
    fn unknown_stakeholder_is_rejected() {
        let err = "regulator".parse::<Stakeholder>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidStakeholder(ref s) if s == "regulator"));
    }

    #[test]
    fn display_matches_stored_value() {
        assert_eq!(Stakeholder::Government.to_string(), "government");
    }
}
