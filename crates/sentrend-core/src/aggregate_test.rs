use super::*;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn empty_label_set_has_no_stats() {
    assert!(BucketStats::from_labels(std::iter::empty::<&str>()).is_none());
}

#[test]
fn single_positive_article() {
    let stats = BucketStats::from_labels(["positive"]).unwrap();
    assert_eq!(stats.total_articles, 1);
    assert_eq!(stats.positive_count, 1);
    assert_eq!(stats.negative_count, 0);
    assert_eq!(stats.neutral_count, 0);
    assert_close(stats.avg_sentiment_score, 1.0);
    assert_close(stats.sentiment_volatility, 0.0);
}

#[test]
fn positive_and_very_negative_average_to_minus_half() {
    let stats = BucketStats::from_labels(["positive", "very_negative"]).unwrap();
    assert_eq!(stats.total_articles, 2);
    assert_eq!(stats.positive_count, 1);
    assert_eq!(stats.negative_count, 1);
    assert_eq!(stats.neutral_count, 0);
    assert_close(stats.avg_sentiment_score, -0.5);
    // values 1 and -2 around mean -0.5: deviations are 1.5 each.
    assert_close(stats.sentiment_volatility, 1.5);
}

#[test]
fn unknown_labels_count_as_neutral_zero() {
    let stats = BucketStats::from_labels(["mixed", "very_positive"]).unwrap();
    assert_eq!(stats.neutral_count, 1);
    assert_eq!(stats.positive_count, 1);
    assert_close(stats.avg_sentiment_score, 1.0);
}

#[test]
fn class_counts_always_sum_to_total() {
    let labels = [
        "very_negative",
        "negative",
        "neutral",
        "positive",
        "very_positive",
        "neutral",
        "garbage",
    ];
    let stats = BucketStats::from_labels(labels).unwrap();
    assert_eq!(
        stats.positive_count + stats.negative_count + stats.neutral_count,
        stats.total_articles
    );
    assert_eq!(stats.total_articles, 7);
    assert_eq!(stats.neutral_count, 3);
}

#[test]
fn rank_keywords_orders_by_count_then_keyword() {
    let ranked = rank_keywords(["chip", "earnings", "chip", "ai", "earnings", "chip"], 10);
    let pairs: Vec<(&str, u32)> = ranked.iter().map(|k| (k.keyword.as_str(), k.count)).collect();
    assert_eq!(pairs, vec![("chip", 3), ("earnings", 2), ("ai", 1)]);
}

#[test]
fn rank_keywords_breaks_ties_alphabetically() {
    let ranked = rank_keywords(["zeta", "alpha", "mid"], 10);
    let names: Vec<&str> = ranked.iter().map(|k| k.keyword.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn rank_keywords_truncates_and_skips_blank() {
    let ranked = rank_keywords(["a", " ", "", "b", "c"], 2);
    assert_eq!(ranked.len(), 2);
    assert!(ranked.iter().all(|k| !k.keyword.trim().is_empty()));
}

#[test]
fn rank_keywords_merges_padded_duplicates() {
    let ranked = rank_keywords(["recall ", "recall", "\trecall\n", "ai"], 10);
    let pairs: Vec<(&str, u32)> = ranked.iter().map(|k| (k.keyword.as_str(), k.count)).collect();
    assert_eq!(pairs, vec![("recall", 3), ("ai", 1)]);
}

#[test]
fn normalize_keyword_trims_ascii_whitespace_only() {
    assert_eq!(normalize_keyword("  chip\r\n"), Some("chip"));
    assert_eq!(normalize_keyword(" \t\x0C "), None);
    assert_eq!(normalize_keyword(""), None);
    assert_eq!(normalize_keyword("\u{a0}chip"), Some("\u{a0}chip"));
}

#[test]
fn normalize_keyword_sql_trims_the_same_characters() {
    assert_eq!(
        normalize_keyword_sql("raw.keyword"),
        "btrim(raw.keyword, E' \\t\\n\\f\\r')"
    );
}

#[test]
fn keyword_count_serializes_as_object() {
    let json = serde_json::to_value(KeywordCount {
        keyword: "recall".to_string(),
        count: 4,
    })
    .unwrap();
    assert_eq!(json, serde_json::json!({ "keyword": "recall", "count": 4 }));
}
