//! Keyword-based question classification.

use crate::types::QuestionCategory;

// Checked in this order; the first category with a matching term wins.
const COMPARATIVE: &[&str] = &[
    "compare",
    "compared",
    "comparison",
    "versus",
    "vs",
    "than",
    "difference between",
    "relative to",
];

const TECHNICAL: &[&str] = &[
    "why",
    "what causes",
    "cause",
    "causes",
    "explain",
    "mechanism",
    "how does",
];

const ACTIONABLE: &[&str] = &[
    "reduce",
    "mitigate",
    "mitigation",
    "recommend",
    "recommendation",
    "recommendations",
    "should",
    "what can",
    "how can",
    "improve",
    "prevent",
    "cool down",
];

const STATISTICAL: &[&str] = &[
    "how many",
    "how much",
    "how hot",
    "how cold",
    "percent",
    "percentage",
    "%",
    "average",
    "mean",
    "median",
    "maximum",
    "minimum",
    "highest",
    "lowest",
    "range",
    "statistics",
    "stats",
];

/// Classify a question into a [`QuestionCategory`].
pub fn classify_question(question: &str) -> QuestionCategory {
    let normalized = normalize(question);
    let table: [(&[&str], QuestionCategory); 4] = [
        (COMPARATIVE, QuestionCategory::Comparative),
        (TECHNICAL, QuestionCategory::Technical),
        (ACTIONABLE, QuestionCategory::Actionable),
        (STATISTICAL, QuestionCategory::Statistical),
    ];
    table
        .into_iter()
        .find(|(terms, _)| terms.iter().any(|t| contains_term(&normalized, t)))
        .map(|(_, category)| category)
        .unwrap_or_default()
}

/// Whether `question` mentions any of `terms` as whole words.
pub(crate) fn mentions(question: &str, terms: &[&str]) -> bool {
    let normalized = normalize(question);
    terms.iter().any(|t| contains_term(&normalized, t))
}

/// Lowercase, turn punctuation into spaces (keeping `%`), and pad with a
/// space on each side so terms can be matched on word boundaries.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    let mut last_space = true;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            out.push(c);
            last_space = false;
        } else if c == '%' {
            if !last_space {
                out.push(' ');
            }
            out.push_str("% ");
            last_space = true;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    if !last_space {
        out.push(' ');
    }
    out
}

fn contains_term(normalized: &str, term: &str) -> bool {
    normalized.contains(&format!(" {term} "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_terms() {
        assert_eq!(
            classify_question("Is the north warmer than the south?"),
            QuestionCategory::Comparative
        );
        assert_eq!(
            classify_question("Compare hot spots vs green areas"),
            QuestionCategory::Comparative
        );
    }

    #[test]
    fn causal_terms() {
        assert_eq!(
            classify_question("Why is it so hot here?"),
            QuestionCategory::Technical
        );
        assert_eq!(
            classify_question("What causes the heat island?"),
            QuestionCategory::Technical
        );
    }

    #[test]
    fn actionable_terms() {
        assert_eq!(
            classify_question("How can we reduce surface temperatures?"),
            QuestionCategory::Actionable
        );
    }

    #[test]
    fn numeric_terms() {
        assert_eq!(
            classify_question("How hot does it get?"),
            QuestionCategory::Statistical
        );
        assert_eq!(
            classify_question("What % of pixels are hot?"),
            QuestionCategory::Statistical
        );
    }

    #[test]
    fn default_is_general() {
        assert_eq!(
            classify_question("Tell me about this place"),
            QuestionCategory::General
        );
    }

    #[test]
    fn matches_whole_words_only() {
        // "thank" must not match "than", "meaning" must not match "mean"
        assert_eq!(
            classify_question("thank you, what is the meaning of this map"),
            QuestionCategory::General
        );
    }

    #[test]
    fn percent_sign_glued_to_number() {
        assert!(mentions("is it above 30%?", &["%"]));
    }
}
