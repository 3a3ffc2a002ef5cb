use std::collections::HashSet;

use crate::backend::{AnnotatedComment, RawComment, SentimentCounts, SentimentPoint};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSummary {
    pub total_comments: usize,
    pub unique_commenters: usize,
    pub avg_word_length: f64,
    pub avg_sentiment_score: f64,
    pub normalized_sentiment_score: f64,
    pub sentiment_counts: SentimentCounts,
}

/// Summary statistics over one collected run. Word counts come from the raw
/// comments, sentiment figures from the annotations; callers guarantee the
/// two slices describe the same comments.
pub fn aggregate(raw: &[RawComment], annotated: &[AnnotatedComment]) -> MetricsSummary {
    if raw.is_empty() {
        return MetricsSummary::default();
    }

    let mut sentiment_counts = SentimentCounts::default();
    let mut total_score: i64 = 0;
    for item in annotated {
        sentiment_counts.record(item.sentiment);
        total_score += item.sentiment.score();
    }

    let total_comments = raw.len();
    let unique_commenters = raw
        .iter()
        .map(|comment| comment.author_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let total_words: usize = raw
        .iter()
        .map(|comment| comment.text.split_whitespace().count())
        .sum();

    let avg_word_length = round2(total_words as f64 / total_comments as f64);
    let avg_sentiment_score = round2(total_score as f64 / total_comments as f64);
    // The 0..10 rescale starts from the already-rounded average, not the raw
    // ratio.
    let normalized_sentiment_score = round2(((avg_sentiment_score + 1.0) / 2.0) * 10.0);

    MetricsSummary {
        total_comments,
        unique_commenters,
        avg_word_length,
        avg_sentiment_score,
        normalized_sentiment_score,
        sentiment_counts,
    }
}

/// Per-comment (timestamp, signed score) pairs in annotation order, the
/// payload shape the trend graph endpoint expects.
pub fn trend_points(annotated: &[AnnotatedComment]) -> Vec<SentimentPoint> {
    annotated
        .iter()
        .map(|item| SentimentPoint {
            timestamp: item.timestamp.clone(),
            sentiment: item.sentiment.score(),
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Sentiment;

    fn raw(author: &str, text: &str) -> RawComment {
        RawComment {
            id: String::new(),
            text: text.to_string(),
            author_id: author.to_string(),
            timestamp: String::new(),
        }
    }

    fn ann(sentiment: Sentiment) -> AnnotatedComment {
        AnnotatedComment {
            comment: "text".to_string(),
            sentiment,
            timestamp: "2024-03-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn counts_and_scores_for_mixed_batch() {
        let raw: Vec<_> = (0..4).map(|i| raw(&format!("a{i}"), "two words")).collect();
        let annotated = vec![
            ann(Sentiment::Positive),
            ann(Sentiment::Positive),
            ann(Sentiment::Neutral),
            ann(Sentiment::Negative),
        ];
        let summary = aggregate(&raw, &annotated);
        assert_eq!(summary.sentiment_counts.positive, 2);
        assert_eq!(summary.sentiment_counts.neutral, 1);
        assert_eq!(summary.sentiment_counts.negative, 1);
        assert_eq!(summary.sentiment_counts.total(), summary.total_comments);
        assert_eq!(summary.avg_sentiment_score, 0.25);
        assert_eq!(summary.normalized_sentiment_score, 6.25);
    }

    #[test]
    fn average_word_length_over_authors() {
        let raw: Vec<_> = (0..100)
            .map(|i| {
                raw(
                    &format!("author-{}", i % 10),
                    "one two three four five six seven eight nine ten",
                )
            })
            .collect();
        let annotated: Vec<_> = (0..100).map(|_| ann(Sentiment::Neutral)).collect();
        let summary = aggregate(&raw, &annotated);
        assert_eq!(summary.total_comments, 100);
        assert_eq!(summary.unique_commenters, 10);
        assert_eq!(summary.avg_word_length, 10.00);
    }

    #[test]
    fn word_count_skips_blank_runs() {
        let raw = vec![raw("a", "  spaced   out \t words \n")];
        let summary = aggregate(&raw, &[ann(Sentiment::Neutral)]);
        assert_eq!(summary.avg_word_length, 3.00);
    }

    #[test]
    fn normalized_score_uses_the_rounded_average() {
        // 1/3 rounds to 0.33 first, so the rescale lands on 6.65 and not 6.67.
        let raw: Vec<_> = (0..3).map(|i| raw(&format!("a{i}"), "w")).collect();
        let annotated = vec![
            ann(Sentiment::Positive),
            ann(Sentiment::Positive),
            ann(Sentiment::Negative),
        ];
        let summary = aggregate(&raw, &annotated);
        assert_eq!(summary.avg_sentiment_score, 0.33);
        assert_eq!(summary.normalized_sentiment_score, 6.65);
    }

    #[test]
    fn score_bounds_hold_at_the_extremes() {
        let raw_all: Vec<_> = (0..5).map(|i| raw(&format!("a{i}"), "w")).collect();
        let negative: Vec<_> = (0..5).map(|_| ann(Sentiment::Negative)).collect();
        let summary = aggregate(&raw_all, &negative);
        assert_eq!(summary.avg_sentiment_score, -1.00);
        assert_eq!(summary.normalized_sentiment_score, 0.00);

        let positive: Vec<_> = (0..5).map(|_| ann(Sentiment::Positive)).collect();
        let summary = aggregate(&raw_all, &positive);
        assert_eq!(summary.avg_sentiment_score, 1.00);
        assert_eq!(summary.normalized_sentiment_score, 10.00);
    }

    #[test]
    fn empty_input_yields_zeroed_summary() {
        let summary = aggregate(&[], &[]);
        assert_eq!(summary, MetricsSummary::default());
    }

    #[test]
    fn trend_points_carry_timestamp_and_signed_score() {
        let annotated = vec![ann(Sentiment::Negative), ann(Sentiment::Positive)];
        let points = trend_points(&annotated);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].sentiment, -1);
        assert_eq!(points[0].timestamp, "2024-03-01T10:00:00Z");
        assert_eq!(points[1].sentiment, 1);
    }
}
