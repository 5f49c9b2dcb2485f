//! Scoring functions for jaster predictions.
//!
//! Every metric scores exactly one `(prediction, reference)` pair; averaging
//! across a dataset is the caller's job. All functions are pure and total
//! over arbitrary strings.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Sentinel score returned when a numeric answer cannot be parsed.
///
/// Kept at -2.0 so unparseable predictions stay distinguishable from every
/// legitimate score in [0, 1] and from a zero correlation.
pub const UNPARSEABLE_SENTINEL: f64 = -2.0;

/// Outcome of coercing free-text model output to a number.
///
/// Numeric tasks receive answers like "The answer is 42." — the digits and
/// decimal point are extracted and parsed, and failure is a value rather
/// than an error so a batch scoring loop can keep going past a single
/// malformed prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed {
    /// The cleaned text parsed as a finite float.
    Value(f64),
    /// Nothing numeric was left after cleaning.
    Unparseable,
}

impl Parsed {
    /// Strips every character that is not an ASCII digit or a decimal point,
    /// then parses the remainder.
    pub fn from_text(text: &str) -> Self {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        match cleaned.parse::<f64>() {
            Ok(v) => Parsed::Value(v),
            Err(_) => {
                tracing::debug!(
                    event = "jaster.score.unparseable_number",
                    input_len = text.len(),
                    "numeric answer could not be parsed, using sentinel"
                );
                Parsed::Unparseable
            }
        }
    }

    /// Collapses to the f64 convention used by the scoring tables:
    /// the parsed value, or [`UNPARSEABLE_SENTINEL`] on failure.
    pub fn as_score(self) -> f64 {
        match self {
            Parsed::Value(v) => v,
            Parsed::Unparseable => UNPARSEABLE_SENTINEL,
        }
    }
}

/// The five metric kinds the scoring registry dispatches over.
///
/// The set is closed: every jaster task maps to exactly one of these, and
/// the by-name table ([`FromStr`]) exposes the same five kinds to callers
/// that carry the metric name in their run config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Byte-for-byte string equality.
    ExactMatch,
    /// Token-sort fuzzy character overlap, normalized to [0, 1].
    CharF1,
    /// Set precision/recall F1 over newline-delimited items.
    SetF1,
    /// Pearson correlation of the parsed numeric answer pair.
    Pearson,
    /// Spearman rank correlation of the parsed numeric answer pair.
    Spearman,
}

impl Metric {
    /// Canonical registry name of this metric kind.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::ExactMatch => "exact_match",
            Metric::CharF1 => "char_f1",
            Metric::SetF1 => "set_f1",
            Metric::Pearson => "pearson",
            Metric::Spearman => "spearman",
        }
    }

    /// Scores one prediction against one gold answer.
    pub fn score(&self, y_pred: &str, y_true: &str) -> f64 {
        match self {
            Metric::ExactMatch => exact_match(y_pred, y_true),
            Metric::CharF1 => char_f1(y_pred, y_true),
            Metric::SetF1 => set_f1(y_pred, y_true),
            Metric::Pearson => pearson(y_pred, y_true),
            Metric::Spearman => spearman(y_pred, y_true),
        }
    }
}

impl FromStr for Metric {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact_match" => Ok(Metric::ExactMatch),
            "char_f1" => Ok(Metric::CharF1),
            "set_f1" => Ok(Metric::SetF1),
            "pearson" => Ok(Metric::Pearson),
            "spearman" => Ok(Metric::Spearman),
            other => Err(RegistryError::UnknownMetric(other.to_string())),
        }
    }
}

fn exact_match(y_pred: &str, y_true: &str) -> f64 {
    if y_pred == y_true {
        1.0
    } else {
        0.0
    }
}

/// Lowercases, splits on non-word characters, sorts the tokens and rejoins.
///
/// This is the preprocessing step of a token-sort ratio: after it, token
/// order and punctuation no longer influence the similarity.
fn token_sort_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut tokens: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn char_f1(y_pred: &str, y_true: &str) -> f64 {
    let pred_key = token_sort_key(y_pred);
    let true_key = token_sort_key(y_true);
    if pred_key.is_empty() || true_key.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(&pred_key, &true_key)
}

/// Trimmed lines of a newline-delimited item list.
///
/// A wholly blank input has no items. Blank lines inside a non-blank input
/// still count as (empty) items, as the original scoring convention has it,
/// so stray blank lines in a prediction cost precision.
fn split_items(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split('\n').map(str::trim).collect()
}

fn set_f1(y_pred: &str, y_true: &str) -> f64 {
    // Gold lines keep their multiplicity; predictions are de-duplicated.
    let gold_items: Vec<&str> = split_items(y_true);
    let pred_items: HashSet<&str> = split_items(y_pred).into_iter().collect();

    if gold_items.is_empty() || pred_items.is_empty() {
        return 0.0;
    }

    let hits = pred_items
        .iter()
        .filter(|p| gold_items.contains(*p))
        .count() as f64;
    let precision = hits / pred_items.len() as f64;
    let recall = hits / gold_items.len() as f64;

    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn pearson(y_pred: &str, y_true: &str) -> f64 {
    let Ok(gold) = y_true.trim().parse::<f64>() else {
        return 0.0;
    };
    let pred = Parsed::from_text(y_pred).as_score();
    nan_to_zero(pearson_coefficient(&[gold], &[pred]))
}

fn spearman(y_pred: &str, y_true: &str) -> f64 {
    let Ok(gold) = y_true.trim().parse::<f64>() else {
        return 0.0;
    };
    let pred = Parsed::from_text(y_pred).as_score();
    nan_to_zero(pearson_coefficient(&ranks(&[gold]), &ranks(&[pred])))
}

fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Sample Pearson correlation coefficient over paired observations.
///
/// A sample with zero variance on either side yields NaN (0/0), which the
/// scoring entry points coerce to 0.0. Over a single pair both variances
/// are zero, so the single-example contract always observes 0.0.
fn pearson_coefficient(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len() as f64;
    if n == 0.0 {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    cov / (var_x * var_y).sqrt()
}

/// Fractional ranks (ties averaged), the rank transform behind Spearman.
fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut out = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Average rank across the tie group, 1-based.
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            out[idx] = rank;
        }
        i = j + 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_match_identity() {
        assert_eq!(Metric::ExactMatch.score("entailment", "entailment"), 1.0);
        assert_eq!(Metric::ExactMatch.score("東京", "東京"), 1.0);
    }

    #[test]
    fn test_exact_match_mismatch() {
        assert_eq!(Metric::ExactMatch.score("entailment", "neutral"), 0.0);
        assert_eq!(Metric::ExactMatch.score("A", "a"), 0.0);
        assert_eq!(Metric::ExactMatch.score("42", "42 "), 0.0);
    }

    #[test]
    fn test_char_f1_identical_strings() {
        assert!(close(Metric::CharF1.score("徳川家康", "徳川家康"), 1.0));
    }

    #[test]
    fn test_char_f1_ignores_token_order() {
        let forward = Metric::CharF1.score("new york city", "city new york");
        assert!(close(forward, 1.0));
    }

    #[test]
    fn test_char_f1_symmetric_on_fixed_pairs() {
        let pairs = [
            ("fuzzy wuzzy was a bear", "wuzzy fuzzy was a hare"),
            ("徳川家康", "徳川"),
            ("the quick brown fox", "a quick brown dog"),
        ];
        for (a, b) in pairs {
            assert!(close(Metric::CharF1.score(a, b), Metric::CharF1.score(b, a)));
        }
    }

    #[test]
    fn test_char_f1_disjoint_strings_score_low() {
        assert!(Metric::CharF1.score("abc", "xyz") < 0.5);
    }

    #[test]
    fn test_char_f1_empty_side_is_zero() {
        assert_eq!(Metric::CharF1.score("", "answer"), 0.0);
        assert_eq!(Metric::CharF1.score("answer", ""), 0.0);
        assert_eq!(Metric::CharF1.score("", ""), 0.0);
    }

    #[test]
    fn test_set_f1_partial_overlap() {
        // precision 1.0, recall 2/3, F1 = 2 * (1 * 2/3) / (1 + 2/3) = 0.8
        let score = Metric::SetF1.score("a\nb", "a\nb\nc");
        assert!(close(score, 0.8));
    }

    #[test]
    fn test_set_f1_exact_set() {
        assert!(close(Metric::SetF1.score("b\na", "a\nb"), 1.0));
    }

    #[test]
    fn test_set_f1_duplicate_predictions_collapse() {
        // "a" twice counts once for precision.
        assert!(close(Metric::SetF1.score("a\na", "a"), 1.0));
    }

    #[test]
    fn test_set_f1_duplicate_gold_lines_inflate_recall_denominator() {
        // gold has two lines, one hit: precision 1.0, recall 0.5, F1 = 2/3
        let score = Metric::SetF1.score("a", "a\na");
        assert!(close(score, 2.0 / 3.0));
    }

    #[test]
    fn test_set_f1_no_overlap_is_zero() {
        assert_eq!(Metric::SetF1.score("x\ny", "a\nb"), 0.0);
    }

    #[test]
    fn test_set_f1_empty_inputs_do_not_fault() {
        assert_eq!(Metric::SetF1.score("", "a\nb"), 0.0);
        assert_eq!(Metric::SetF1.score("a", ""), 0.0);
        assert_eq!(Metric::SetF1.score("", ""), 0.0);
        assert_eq!(Metric::SetF1.score("\n\n", "a"), 0.0);
    }

    #[test]
    fn test_set_f1_blank_lines_inside_prediction_cost_precision() {
        // The blank line is an (empty) predicted item that is not in gold:
        // precision 2/3, recall 1.0, F1 = 0.8
        assert!(close(Metric::SetF1.score("a\n\nb", "a\nb"), 0.8));
    }

    #[test]
    fn test_set_f1_trailing_gold_blank_line_counts_in_recall() {
        // Gold items are ["a", ""]: precision 1.0, recall 0.5, F1 = 2/3
        assert!(close(Metric::SetF1.score("a", "a\n"), 2.0 / 3.0));
    }

    #[test]
    fn test_set_f1_trims_item_whitespace() {
        assert!(close(Metric::SetF1.score(" a \n b", "a\nb"), 1.0));
    }

    #[test]
    fn test_parse_float_extracts_embedded_number() {
        assert_eq!(Parsed::from_text("The answer is 42."), Parsed::Value(42.0));
        assert_eq!(Parsed::from_text("3.5点"), Parsed::Value(3.5));
        assert_eq!(Parsed::from_text("42"), Parsed::Value(42.0));
    }

    #[test]
    fn test_parse_float_failure_is_sentinel() {
        assert_eq!(Parsed::from_text("no numbers here"), Parsed::Unparseable);
        assert_eq!(Parsed::from_text(""), Parsed::Unparseable);
        assert_eq!(Parsed::from_text("..."), Parsed::Unparseable);
        assert_eq!(Parsed::from_text("1.2.3"), Parsed::Unparseable);
        assert_eq!(Parsed::from_text("nope").as_score(), UNPARSEABLE_SENTINEL);
    }

    #[test]
    fn test_pearson_single_pair_is_always_zero() {
        assert_eq!(Metric::Pearson.score("3.5", "3.5"), 0.0);
        assert_eq!(Metric::Pearson.score("The score is 4.0", "4.0"), 0.0);
        assert_eq!(Metric::Pearson.score("not a number", "2.0"), 0.0);
        assert_eq!(Metric::Pearson.score("1.0", "not a number"), 0.0);
    }

    #[test]
    fn test_spearman_single_pair_is_always_zero() {
        assert_eq!(Metric::Spearman.score("3.5", "3.5"), 0.0);
        assert_eq!(Metric::Spearman.score("garbage", "1.0"), 0.0);
    }

    #[test]
    fn test_pearson_coefficient_on_correlated_samples() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!(close(pearson_coefficient(&xs, &ys), 1.0));
        let inverted = [8.0, 6.0, 4.0, 2.0];
        assert!(close(pearson_coefficient(&xs, &inverted), -1.0));
    }

    #[test]
    fn test_ranks_average_ties() {
        assert_eq!(ranks(&[10.0, 20.0, 20.0, 30.0]), vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn test_metric_names_round_trip() {
        for metric in [
            Metric::ExactMatch,
            Metric::CharF1,
            Metric::SetF1,
            Metric::Pearson,
            Metric::Spearman,
        ] {
            assert_eq!(metric.name().parse::<Metric>(), Ok(metric));
        }
    }

    #[test]
    fn test_unknown_metric_name_errors() {
        let err = "bleu".parse::<Metric>().unwrap_err();
        assert_eq!(err, RegistryError::UnknownMetric("bleu".to_string()));
    }

    #[test]
    fn test_metric_serializes_to_registry_name() {
        let json = serde_json::to_string(&Metric::CharF1).unwrap();
        assert_eq!(json, "\"char_f1\"");
    }
}
