//! Decoders for free-form model replies
//!
//! Models do not reliably follow the requested format, so every decoder
//! accepts the requested shape first and degrades to a plain-text reading.

use serde::{Deserialize, Serialize};

const QUESTION_MARKER: &str = "question:";
const ANSWER_MARKER: &str = "correct answer:";

/// Quiz fields as found in the reply
///
/// `None` means the marker was absent; `Some("")` means it was present with
/// nothing after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuiz {
    pub question: Option<String>,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
}

/// A quiz that can be shown to a learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl ParsedQuiz {
    /// Validate the parsed fields
    ///
    /// Requires a non-empty question, at least one option and a non-empty
    /// answer. An answer given as a bare letter or differing from an option
    /// only in case is replaced by that option's text, so that submitted
    /// option text compares equal.
    pub fn into_quiz(self) -> Option<Quiz> {
        let question = self.question.filter(|q| !q.is_empty())?;
        if self.options.is_empty() {
            return None;
        }
        let answer = self.correct_answer.filter(|a| !a.is_empty())?;
        let correct_answer = resolve_answer(&answer, &self.options).unwrap_or(answer);

        Some(Quiz {
            question,
            options: self.options,
            correct_answer,
        })
    }
}

fn resolve_answer(answer: &str, options: &[String]) -> Option<String> {
    if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(answer)) {
        return Some(option.clone());
    }

    // "B", "B)" or "B."
    let letter = answer.trim_end_matches([')', '.']);
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
            options.get(index).cloned()
        }
        _ => None,
    }
}

/// Strip a case-insensitive `marker` from the start of `line`
fn strip_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let head = line.get(..marker.len())?;
    if head.eq_ignore_ascii_case(marker) {
        Some(line[marker.len()..].trim())
    } else {
        None
    }
}

/// Parse a quiz reply in the `Question:` / `- option` / `Correct Answer:` format
///
/// The first occurrence of each marker wins. Lines that match nothing, such
/// as the `Options:` header, are ignored.
pub fn parse_quiz(text: &str) -> ParsedQuiz {
    let mut parsed = ParsedQuiz::default();

    for raw in text.lines() {
        let line = raw.trim();

        if let Some(question) = strip_marker(line, QUESTION_MARKER) {
            if parsed.question.is_none() {
                parsed.question = Some(question.to_string());
            }
        } else if let Some(answer) = strip_marker(line, ANSWER_MARKER) {
            if parsed.correct_answer.is_none() {
                parsed.correct_answer = Some(answer.to_string());
            }
        } else if let Some(option) = line.strip_prefix("- ") {
            let option = option.trim();
            if !option.is_empty() {
                parsed.options.push(option.to_string());
            }
        }
    }

    parsed
}

/// Definition fields returned by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefinitionReply {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub part_of_speech: String,
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().trim_end_matches("```").trim()
}

/// Decode a definition reply
///
/// A JSON object with `definition` and `part_of_speech` is preferred;
/// anything else is taken as the plain-text definition.
pub fn decode_definition(text: &str) -> DefinitionReply {
    let body = strip_code_fence(text);

    // A JSON object is taken as is, even with an empty definition
    if body.starts_with('{') {
        if let Ok(reply) = serde_json::from_str::<DefinitionReply>(body) {
            return DefinitionReply {
                definition: reply.definition.trim().to_string(),
                part_of_speech: reply.part_of_speech.trim().to_lowercase(),
            };
        }
    }

    DefinitionReply {
        definition: body.to_string(),
        part_of_speech: String::new(),
    }
}

/// Decode an examples reply
///
/// A JSON array of strings is preferred; otherwise each non-empty line is a
/// sentence, with list numbering and bullets removed.
pub fn decode_examples(text: &str) -> Vec<String> {
    let body = strip_code_fence(text);

    if let Ok(sentences) = serde_json::from_str::<Vec<String>>(body) {
        return sentences
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    body.lines()
        .map(strip_list_prefix)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_prefix(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
        .unwrap_or(line);

    // "1. " or "2) "
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim();
        }
    }
    line.trim()
}
