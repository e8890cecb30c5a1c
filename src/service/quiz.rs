use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::linguistic::Quiz;
use crate::store::User;

use super::VocabularyService;

/// Path of the quiz page, used to build `next_url`
pub const QUIZ_PATH: &str = "/quiz";

/// Message shown when the model's quiz could not be used
pub const QUIZ_UNAVAILABLE: &str = "Could not generate a question.";

/// The word a quiz is about, without its definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizWord {
    pub id: Uuid,
    pub word: String,
    pub part_of_speech: String,
    pub audio_file_url: Option<String>,
}

/// What the quiz page should show
#[derive(Debug, Clone, PartialEq)]
pub enum QuizState {
    /// The collection is empty
    NoWords,
    /// The model reply could not be turned into a quiz
    Unavailable { message: String },
    Ready {
        user_word_id: i64,
        word: QuizWord,
        quiz: Quiz,
    },
}

/// Result of answering a quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub correct: bool,
    pub next_url: String,
}

/// How a request reached the service, as reported by its headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    /// `Host` header
    pub host: Option<String>,
    /// `X-Forwarded-Proto` header set by a TLS-terminating proxy
    pub forwarded_proto: Option<String>,
}

impl RequestOrigin {
    pub fn new(host: Option<String>, forwarded_proto: Option<String>) -> Self {
        Self {
            host,
            forwarded_proto,
        }
    }

    /// Scheme of the original request; anything but `https` counts as `http`
    fn scheme(&self) -> &'static str {
        // A proxy chain lists the client-facing protocol first
        let proto = self
            .forwarded_proto
            .as_deref()
            .and_then(|value| value.split(',').next())
            .map(str::trim);
        match proto {
            Some(p) if p.eq_ignore_ascii_case("https") => "https",
            _ => "http",
        }
    }
}

/// Absolute URL of the quiz page
///
/// A configured public URL wins over request headers. Without either, the
/// bare path is returned.
pub fn next_quiz_url(public_url: Option<&str>, origin: &RequestOrigin) -> String {
    if let Some(base) = public_url.map(str::trim).filter(|b| !b.is_empty()) {
        return format!("{}{}", base.trim_end_matches('/'), QUIZ_PATH);
    }

    match origin.host.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
        Some(host) => format!("{}://{}{}", origin.scheme(), host, QUIZ_PATH),
        None => QUIZ_PATH.to_string(),
    }
}

impl VocabularyService {
    /// Build a quiz for the user's least familiar word
    pub async fn next_quiz(&self, user: &User) -> Result<QuizState, AppError> {
        let Some(entry) = self.store.least_familiar_user_word(user.id).await? else {
            return Ok(QuizState::NoWords);
        };

        let parsed = self.linguist.generate_quiz_options(&entry.word.word).await?;
        let Some(quiz) = parsed.into_quiz() else {
            log::warn!("unusable quiz reply for '{}'", entry.word.word);
            return Ok(QuizState::Unavailable {
                message: QUIZ_UNAVAILABLE.to_string(),
            });
        };

        Ok(QuizState::Ready {
            user_word_id: entry.user_word.id,
            word: QuizWord {
                audio_file_url: self.audio_url(entry.word.audio_file.as_deref()),
                id: entry.word.id,
                word: entry.word.word,
                part_of_speech: entry.word.part_of_speech,
            },
            quiz,
        })
    }

    /// Record an answer submitted now
    pub async fn submit_answer(
        &self,
        user: &User,
        user_word_id: i64,
        selected_answer: &str,
        correct_answer: &str,
        origin: &RequestOrigin,
    ) -> Result<SubmitOutcome, AppError> {
        self.submit_answer_at(
            user,
            user_word_id,
            selected_answer,
            correct_answer,
            origin,
            Utc::now(),
        )
        .await
    }

    /// Record an answer submitted at `now`
    ///
    /// A wrong answer adds one to the familiarity score; every answer
    /// updates the review time.
    pub async fn submit_answer_at(
        &self,
        user: &User,
        user_word_id: i64,
        selected_answer: &str,
        correct_answer: &str,
        origin: &RequestOrigin,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, AppError> {
        if self.store.get_user_word(user.id, user_word_id).await?.is_none() {
            return Err(AppError::NotFound("Word not found in your collection".to_string()));
        }

        let correct = selected_answer.trim() == correct_answer.trim();
        let user_word = self.store.record_review(user_word_id, !correct, now).await?;
        log::debug!(
            "user {} answered {} for user word {} (score {})",
            user.username,
            if correct { "correctly" } else { "incorrectly" },
            user_word.id,
            user_word.familiarity_score
        );

        Ok(SubmitOutcome {
            correct,
            next_url: next_quiz_url(self.public_url.as_deref(), origin),
        })
    }
}
