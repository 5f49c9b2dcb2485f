//! Controllability checks: does a prediction's surface form match the
//! output grammar its task expects?
//!
//! Every check is a total predicate over arbitrary strings. Malformed input
//! never errors, it just fails the check. Correctness of the answer is
//! deliberately out of scope here; that is what the scoring registry is for.

use serde::{Deserialize, Serialize};

/// Sentiment polarity labels accepted by the chABSA grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

impl Polarity {
    pub fn label(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Neutral => "neutral",
            Polarity::Negative => "negative",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "positive" => Some(Polarity::Positive),
            "neutral" => Some(Polarity::Neutral),
            "negative" => Some(Polarity::Negative),
            _ => None,
        }
    }
}

/// Entity categories accepted by the wiki_ner tagged-span grammar.
///
/// The labels are the Japanese category names the dataset uses verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NerTag {
    Organization,
    Person,
    Location,
    ProperNoun,
    Date,
    Time,
    Money,
    Percentage,
}

impl NerTag {
    pub fn label(&self) -> &'static str {
        match self {
            NerTag::Organization => "組織名",
            NerTag::Person => "人名",
            NerTag::Location => "地名",
            NerTag::ProperNoun => "固有物名",
            NerTag::Date => "日付表現",
            NerTag::Time => "時刻表現",
            NerTag::Money => "金額表現",
            NerTag::Percentage => "割合表現",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "組織名" => Some(NerTag::Organization),
            "人名" => Some(NerTag::Person),
            "地名" => Some(NerTag::Location),
            "固有物名" => Some(NerTag::ProperNoun),
            "日付表現" => Some(NerTag::Date),
            "時刻表現" => Some(NerTag::Time),
            "金額表現" => Some(NerTag::Money),
            "割合表現" => Some(NerTag::Percentage),
            _ => None,
        }
    }
}

/// The format grammars the validator registry dispatches over.
///
/// `Unconstrained` is an explicit no-op entry: the task is in the registry
/// but enforces no surface form, and `check` returns no verdict for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatCheck {
    /// Whole string is a non-empty run of digit characters
    /// (Unicode-aware, so fullwidth numerals pass).
    AllDigits,
    /// One of the multiple-choice letters A, B, C, D (case-sensitive).
    ChoiceAbcd,
    /// One of the lowercase letters a, b.
    ChoiceAb,
    /// A single digit in 0..=4.
    ZeroToFour,
    /// The digit 0 or 1.
    ZeroOrOne,
    /// Two-way entailment label.
    Entailment2,
    /// Three-way entailment label.
    Entailment3,
    /// The jsem answer vocabulary.
    JsemLabel,
    /// Whitespace-separated `span（tag）` segments, tags from [`NerTag`].
    WikiNer,
    /// One `head -> dependent` arrow pair per line.
    WikiDependency,
    /// One `token polarity` pair per line, polarity from [`Polarity`].
    Chabsa,
    /// No format constraint; check yields no verdict.
    Unconstrained,
}

impl FormatCheck {
    /// Checks one prediction against this grammar.
    ///
    /// Returns `Some(true)` / `Some(false)` for constrained grammars and
    /// `None` for [`FormatCheck::Unconstrained`].
    pub fn check(&self, text: &str) -> Option<bool> {
        match self {
            FormatCheck::AllDigits => {
                Some(!text.is_empty() && text.chars().all(char::is_numeric))
            }
            FormatCheck::ChoiceAbcd => Some(matches!(text, "A" | "B" | "C" | "D")),
            FormatCheck::ChoiceAb => Some(matches!(text, "a" | "b")),
            FormatCheck::ZeroToFour => Some(matches!(text, "0" | "1" | "2" | "3" | "4")),
            FormatCheck::ZeroOrOne => Some(matches!(text, "0" | "1")),
            FormatCheck::Entailment2 => Some(matches!(text, "entailment" | "non-entailment")),
            FormatCheck::Entailment3 => {
                Some(matches!(text, "entailment" | "contradiction" | "neutral"))
            }
            FormatCheck::JsemLabel => Some(matches!(text, "yes" | "no" | "unknown" | "undef")),
            FormatCheck::WikiNer => Some(text.split_whitespace().all(is_tagged_span)),
            FormatCheck::WikiDependency => Some(text.split('\n').all(is_dependency_line)),
            FormatCheck::Chabsa => Some(text.split('\n').all(is_sentiment_line)),
            FormatCheck::Unconstrained => None,
        }
    }
}

/// `span（tag）` with a non-empty span and a known tag. The tag is taken at
/// the last fullwidth `（` so the span itself may contain parentheses.
fn is_tagged_span(segment: &str) -> bool {
    let Some(body) = segment.strip_suffix('）') else {
        return false;
    };
    let Some((span, tag)) = body.rsplit_once('（') else {
        return false;
    };
    !span.is_empty() && NerTag::from_label(tag).is_some()
}

/// A line holds a dependency pair if some `->` has non-whitespace text on
/// both sides.
fn is_dependency_line(line: &str) -> bool {
    line.match_indices("->").any(|(idx, _)| {
        !line[..idx].trim().is_empty() && !line[idx + 2..].trim().is_empty()
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `<token> <polarity>`: a leading run of word characters, at least one
/// whitespace character, then exactly one polarity label.
fn is_sentiment_line(line: &str) -> bool {
    let token_end = line
        .find(|c: char| !is_word_char(c))
        .unwrap_or(line.len());
    if token_end == 0 {
        return false;
    }
    let rest = &line[token_end..];
    let after_sep = rest.trim_start();
    if after_sep.len() == rest.len() {
        // First character after the token was not whitespace.
        return false;
    }
    Polarity::from_label(after_sep.trim_end()).is_some()
}
