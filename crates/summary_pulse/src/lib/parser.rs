//! # Summary Parser
//!
//! Turns the text a language model returned into a [`Summary`].
//!
//! Decoding happens in two tiers. The strict tier expects the JSON object the
//! system prompt asks for. Models do not reliably honor that request, so when
//! strict decoding fails the heuristic tier structures free text instead:
//!
//! * the first paragraph (up to the first blank line) is the summary,
//! * bullet or numbered lines are key points,
//! * a `Topics:` / `Temas:` line, comma separated, gives the topics.
//!
//! The heuristic tier never fails; missing parts come back empty.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Summary;

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```$").unwrap());

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[•·*-]|\d{1,2}[.)])\s+(.+?)\s*$").unwrap());

static TOPICS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[•·*-]\s+)?[*_]{0,2}\s*(?:topics|temas)\s*[*_]{0,2}\s*:\s*[*_]{0,2}\s*(.*?)\s*$")
        .unwrap()
});

static SUMMARY_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*#*\s*[*_]{0,2}\s*(?:summary|resumen)\s*[*_]{0,2}\s*:\s*[*_]{0,2}\s*")
        .unwrap()
});

/// Decodes a model response.
///
/// Never fails while `allow_fallback` is set; otherwise the strict tier's
/// error is returned.
pub fn decode_summary(text: &str, allow_fallback: bool) -> Result<Summary, serde_json::Error> {
    match decode_strict(text) {
        Ok(summary) => Ok(summary),
        Err(e) if allow_fallback => {
            tracing::warn!(error = %e, "Model response is not valid summary JSON, structuring free text");
            Ok(structure_free_text(text))
        }
        Err(e) => Err(e),
    }
}

/// Strict tier: the response must hold the summary JSON object, optionally
/// wrapped in a Markdown code fence or surrounded by prose.
///
/// The decoded object is returned as is; no caps are applied to
/// `keyPoints` or `topics`.
pub fn decode_strict(text: &str) -> Result<Summary, serde_json::Error> {
    let text = text.trim();
    let text = CODE_FENCE_RE
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map_or(text, |m| m.as_str().trim());

    match serde_json::from_str::<Summary>(text) {
        Ok(summary) => Ok(summary),
        Err(e) => embedded_object(text)
            .and_then(|obj| serde_json::from_str::<Summary>(obj).ok())
            .ok_or(e),
    }
}

/// The outermost `{ ... }` span, if the text has one besides itself.
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end && (start > 0 || end + 1 < text.len())).then(|| &text[start..=end])
}

/// Heuristic tier: best-effort structuring of free text.
pub fn structure_free_text(text: &str) -> Summary {
    let mut summary_lines = Vec::new();
    let mut key_points = Vec::new();
    let mut topics = None;
    let mut in_first_paragraph = true;

    for line in text.trim().lines() {
        if line.trim().is_empty() {
            if !summary_lines.is_empty() {
                in_first_paragraph = false;
            }
            continue;
        }

        if let Some(cap) = TOPICS_RE.captures(line) {
            in_first_paragraph = false;
            if topics.is_none() {
                topics = Some(split_topics(cap.get(1).map_or("", |m| m.as_str())));
            }
            continue;
        }

        if let Some(cap) = BULLET_RE.captures(line) {
            in_first_paragraph = false;
            let point = cap.get(1).map_or("", |m| m.as_str()).trim();
            if !point.is_empty() {
                key_points.push(point.to_string());
            }
            continue;
        }

        if in_first_paragraph {
            summary_lines.push(line.trim());
        }
    }

    let summary = summary_lines.join(" ");
    let summary = SUMMARY_LABEL_RE.replace(&summary, "").trim().to_string();

    Summary {
        summary,
        key_points,
        topics: topics.unwrap_or_default(),
        sections: None,
    }
}

fn split_topics(list: &str) -> Vec<String> {
    list.split(',')
        .map(|t| t.trim().trim_end_matches('.').trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
