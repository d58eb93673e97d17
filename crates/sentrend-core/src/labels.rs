//! Sentiment label mapping.
//!
//! The classifier writes labels as free text. [`label_value`] turns a label
//! into the signed scale `-2..=2` and is the only mapping in the workspace:
//! the SQL read paths embed the `CASE` expression built by
//! [`label_value_sql`] from the same table.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// The five-value ordered sentiment scale produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 5] = [
        SentimentLabel::VeryNegative,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
        SentimentLabel::VeryPositive,
    ];

    /// Signed scale value, `very_negative = -2` through `very_positive = 2`.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            SentimentLabel::VeryNegative => -2,
            SentimentLabel::Negative => -1,
            SentimentLabel::Neutral => 0,
            SentimentLabel::Positive => 1,
            SentimentLabel::VeryPositive => 2,
        }
    }

    /// The label as stored in `news_articles.sentiment_label`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::VeryNegative => "very_negative",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
            SentimentLabel::VeryPositive => "very_positive",
        }
    }

    /// Exact-match parse. Matching is case-sensitive because the SQL `CASE`
    /// expression compares stored text the same way.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == label)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a stored label to its signed value. Unrecognized labels map to `0`.
#[must_use]
pub fn label_value(label: &str) -> i32 {
    SentimentLabel::parse(label).map_or(0, SentimentLabel::value)
}

/// Three-way class derived from the sign of a mapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentClass {
    Positive,
    Negative,
    Neutral,
}

impl SentimentClass {
    #[must_use]
    pub fn of(value: i32) -> Self {
        match value.signum() {
            1 => SentimentClass::Positive,
            -1 => SentimentClass::Negative,
            _ => SentimentClass::Neutral,
        }
    }
}

/// Build a parenthesised SQL `CASE` expression mapping `column` to the same
/// integers as [`label_value`].
///
/// `column` is spliced verbatim and must be a trusted column reference, never
/// caller input. A `NULL` column yields `0`; callers filter `NULL` labels
/// before aggregating.
#[must_use]
pub fn label_value_sql(column: &str) -> String {
    let mut sql = format!("(CASE {column}");
    for label in SentimentLabel::ALL {
        let _ = write!(sql, " WHEN '{}' THEN {}", label.as_str(), label.value());
    }
    sql.push_str(" ELSE 0 END)");
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_values_are_ordered_from_minus_two_to_two() {
        let values: Vec<i32> = SentimentLabel::ALL.iter().map(|l| l.value()).collect();
        assert_eq!(values, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn known_labels_map_through_label_value() {
        assert_eq!(label_value("very_negative"), -2);
        assert_eq!(label_value("negative"), -1);
        assert_eq!(label_value("neutral"), 0);
        assert_eq!(label_value("positive"), 1);
        assert_eq!(label_value("very_positive"), 2);
    }

    #[test]
    fn unknown_label_maps_to_zero() {
        assert_eq!(label_value("ecstatic"), 0);
        assert_eq!(label_value(""), 0);
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(SentimentLabel::parse("Positive"), None);
        assert_eq!(label_value("POSITIVE"), 0);
    }

    #[test]
    fn parse_round_trips_as_str() {
        for label in SentimentLabel::ALL {
            assert_eq!(SentimentLabel::parse(label.as_str()), Some(label));
        }
    }

    #[test]
    fn class_follows_sign() {
        assert_eq!(SentimentClass::of(2), SentimentClass::Positive);
        assert_eq!(SentimentClass::of(1), SentimentClass::Positive);
        assert_eq!(SentimentClass::of(0), SentimentClass::Neutral);
        assert_eq!(SentimentClass::of(-1), SentimentClass::Negative);
        assert_eq!(SentimentClass::of(-2), SentimentClass::Negative);
    }

    #[test]
    fn sql_case_contains_every_label_and_neutral_default() {
        let sql = label_value_sql("a.sentiment_label");
        assert!(sql.starts_with("(CASE a.sentiment_label"));
        for label in SentimentLabel::ALL {
            let arm = format!("WHEN '{}' THEN {}", label.as_str(), label.value());
            assert!(sql.contains(&arm), "missing arm {arm} in {sql}");
        }
        assert!(sql.ends_with("ELSE 0 END)"));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&SentimentLabel::VeryPositive).unwrap();
        assert_eq!(json, "\"very_positive\"");
    }
}
