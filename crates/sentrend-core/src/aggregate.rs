//! Full-recompute aggregation for one trend bucket.
//!
//! A bucket is never patched with deltas: [`BucketStats::from_labels`] is fed
//! every labeled article sharing the bucket key and the result replaces the
//! stored row wholesale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::labels::{label_value, SentimentClass};

/// Number of keywords kept in `sentiment_trends.top_keywords`.
pub const TOP_KEYWORDS_PER_BUCKET: usize = 10;

/// Aggregate figures for one `(company, stakeholder, date)` bucket.
///
/// Constructed only from a complete label set, so
/// `positive_count + negative_count + neutral_count == total_articles` holds
/// for every value of this type.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub total_articles: i32,
    pub positive_count: i32,
    pub negative_count: i32,
    pub neutral_count: i32,
    /// Arithmetic mean of mapped values, in `[-2.0, 2.0]`.
    pub avg_sentiment_score: f64,
    /// Population standard deviation of mapped values.
    pub sentiment_volatility: f64,
}

impl BucketStats {
    /// Aggregate a bucket from the labels of all its articles.
    ///
    /// Returns `None` for an empty label set; there is no meaningful mean and
    /// the caller has nothing to upsert.
    pub fn from_labels<'a, I>(labels: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let values: Vec<i32> = labels.into_iter().map(label_value).collect();
        if values.is_empty() {
            return None;
        }

        let mut positive_count = 0_i32;
        let mut negative_count = 0_i32;
        let mut neutral_count = 0_i32;
        let mut sum = 0.0_f64;
        for &value in &values {
            match SentimentClass::of(value) {
                SentimentClass::Positive => positive_count = positive_count.saturating_add(1),
                SentimentClass::Negative => negative_count = negative_count.saturating_add(1),
                SentimentClass::Neutral => neutral_count = neutral_count.saturating_add(1),
            }
            sum += f64::from(value);
        }

        let total_articles = positive_count
            .saturating_add(negative_count)
            .saturating_add(neutral_count);
        let n = f64::from(total_articles);
        let avg_sentiment_score = sum / n;
        let variance = values
            .iter()
            .map(|&v| (f64::from(v) - avg_sentiment_score).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            total_articles,
            positive_count,
            negative_count,
            neutral_count,
            avg_sentiment_score,
            sentiment_volatility: variance.sqrt(),
        })
    }
}

/// One entry of a bucket's `top_keywords` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u32,
}

/// Canonical form of a stored keyword: ASCII whitespace trimmed from both
/// ends. Returns `None` for blank keywords, which are never counted.
#[must_use]
pub fn normalize_keyword(keyword: &str) -> Option<&str> {
    let keyword = keyword.trim_ascii();
    (!keyword.is_empty()).then_some(keyword)
}

/// SQL expression applying [`normalize_keyword`]'s trim to `column`.
///
/// Blank results come out as `''`; callers filter them. `column` is spliced
/// verbatim and must be a trusted column reference.
#[must_use]
pub fn normalize_keyword_sql(column: &str) -> String {
    // Same set as `u8::is_ascii_whitespace`.
    format!("btrim({column}, E' \\t\\n\\f\\r')")
}

/// Count keyword mentions and return the `limit` most frequent.
///
/// Keywords are counted in their [`normalize_keyword`] form. Ties are broken
/// alphabetically so the stored list is deterministic.
#[must_use]
pub fn rank_keywords<'a, I>(keywords: I, limit: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for keyword in keywords.into_iter().filter_map(normalize_keyword) {
        let entry = counts.entry(keyword).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    let mut ranked: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(keyword, count)| KeywordCount {
            keyword: keyword.to_string(),
            count,
        })
        .collect();
    // BTreeMap iteration is already alphabetical; a stable sort keeps it per count.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
