//! Post-processing of completion text.

use crate::context::prompt::mode_template;
use crate::error::ClientError;
use crate::types::AnalysisMode;

const MIN_CHARS: usize = 10;
const MIN_WORDS: usize = 5;

/// Phrases that mark a refusal or an error echoed back as text.
const ERROR_MARKERS: &[&str] = &[
    "i don't have access",
    "i cannot access",
    "i'm unable to",
    "error occurred",
    "something went wrong",
];

/// Reject completions too thin to show to a user.
pub(crate) fn check_quality(text: &str) -> Result<(), ClientError> {
    let trimmed = text.trim();
    let reject = |why: &str| ClientError::InvalidResponse {
        raw: format!("{why}: {trimmed}"),
    };

    if trimmed.chars().count() < MIN_CHARS {
        return Err(reject("response too short"));
    }
    if trimmed.split_whitespace().count() < MIN_WORDS {
        return Err(reject("response lacks detail"));
    }
    let lower = trimmed.to_lowercase();
    if let Some(marker) = ERROR_MARKERS.iter().find(|m| lower.contains(*m)) {
        return Err(reject(&format!("response contains \"{marker}\"")));
    }
    Ok(())
}

/// Normalize markdown spacing.
///
/// CRLF becomes LF, trailing whitespace is stripped, `##Heading` gains its
/// space, and runs of blank lines collapse to one.
pub(crate) fn normalize_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.trim().replace("\r\n", "\n").lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(&fix_heading(line));
        out.push('\n');
    }

    out.truncate(out.trim_end().len());
    out
}

fn fix_heading(line: &str) -> String {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        let rest = &line[hashes..];
        if !rest.is_empty() && !rest.starts_with(' ') {
            return format!("{} {}", &line[..hashes], rest);
        }
    }
    line.to_string()
}

/// Wrap normalized text with the mode label and a data-source footer.
pub(crate) fn decorate(text: &str, mode: AnalysisMode, location: &str) -> String {
    format!(
        "**{}**\n\n{}\n\n---\n*Analysis based on {} land surface temperature data. Mode: {}*",
        mode_template(mode).answer_label,
        text,
        location,
        mode
    )
}
