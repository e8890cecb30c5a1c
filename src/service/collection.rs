use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::{User, UserWordEntry};

use super::VocabularyService;

/// Result of saving a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    /// False when the word was already in the collection
    pub created: bool,
}

/// One entry of a user's collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWordView {
    pub id: i64,
    pub word_id: Uuid,
    pub word: String,
    pub part_of_speech: String,
    pub definition: String,
    pub examples: Vec<String>,
    pub familiarity_score: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub audio_file_url: Option<String>,
}

impl VocabularyService {
    pub(crate) fn user_word_view(&self, entry: UserWordEntry) -> UserWordView {
        UserWordView {
            audio_file_url: self.audio_url(entry.word.audio_file.as_deref()),
            id: entry.user_word.id,
            word_id: entry.word.id,
            word: entry.word.word,
            part_of_speech: entry.word.part_of_speech,
            definition: entry.word.definition,
            examples: entry.word.examples,
            familiarity_score: entry.user_word.familiarity_score,
            last_reviewed: entry.user_word.last_reviewed,
        }
    }

    /// Add a word to the user's collection
    pub async fn save_word(&self, user: &User, word_id: Uuid) -> Result<SaveOutcome, AppError> {
        if self.store.get_word(word_id).await?.is_none() {
            return Err(AppError::NotFound("Word not found".to_string()));
        }

        let (user_word, created) = self.store.get_or_create_user_word(user.id, word_id).await?;
        if created {
            log::info!("user {} saved word {} as {}", user.username, word_id, user_word.id);
        }

        Ok(SaveOutcome {
            success: true,
            created,
        })
    }

    /// Remove a word from the user's collection
    pub async fn remove_word(&self, user: &User, word_id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_user_word(user.id, word_id).await? {
            return Err(AppError::NotFound(
                "Word not found in your collection".to_string(),
            ));
        }
        log::info!("user {} removed word {}", user.username, word_id);
        Ok(())
    }

    /// The user's collection, least familiar first
    pub async fn my_words(&self, user: &User) -> Result<Vec<UserWordView>, AppError> {
        let entries = self.store.list_user_words(user.id).await?;
        Ok(entries
            .into_iter()
            .map(|entry| self.user_word_view(entry))
            .collect())
    }
}
