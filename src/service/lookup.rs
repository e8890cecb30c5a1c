use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::{NewWord, User, Word};

use super::VocabularyService;

/// Longest accepted word or phrase, in characters
pub const MAX_WORD_LENGTH: usize = 255;

/// Trim and lowercase user input
///
/// # Errors
///
/// `AppError::Validation` for empty input or input over [`MAX_WORD_LENGTH`].
pub fn normalize_word(raw: &str) -> Result<String, AppError> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() {
        return Err(AppError::Validation("Word is required".to_string()));
    }
    if word.chars().count() > MAX_WORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Word must be at most {} characters",
            MAX_WORD_LENGTH
        )));
    }
    Ok(word)
}

/// Codename of a normalized word: spaces become underscores
pub fn codename_for(word: &str) -> String {
    word.replace(' ', "_")
}

/// Lookup result as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordView {
    pub id: Uuid,
    pub word: String,
    pub part_of_speech: String,
    pub definition: String,
    pub examples: Vec<String>,
    pub is_saved: bool,
    pub audio_file_url: Option<String>,
}

impl VocabularyService {
    /// Resolve a word, generating and storing it on first sight
    ///
    /// Stored words are returned without contacting the language model.
    /// Missing audio is synthesized when a synthesizer is configured;
    /// synthesis failures are logged and leave the audio empty.
    pub async fn lookup(&self, user: Option<&User>, raw: &str) -> Result<WordView, AppError> {
        let text = normalize_word(raw)?;

        let word = match self.store.find_word(&text).await? {
            Some(word) => {
                log::debug!("lookup hit for '{}'", text);
                word
            }
            None => self.generate_word(&text).await?,
        };

        let word = self.ensure_audio(word).await;

        let is_saved = match user {
            Some(user) => self.store.find_user_word(user.id, word.id).await?.is_some(),
            None => false,
        };

        Ok(WordView {
            audio_file_url: self.audio_url(word.audio_file.as_deref()),
            id: word.id,
            word: word.word,
            part_of_speech: word.part_of_speech,
            definition: word.definition,
            examples: word.examples,
            is_saved,
        })
    }

    async fn generate_word(&self, text: &str) -> Result<Word, AppError> {
        log::info!("generating definition for '{}'", text);
        let definition = self.linguist.get_word_definition(text).await?;
        let examples = self
            .linguist
            .get_word_examples(text, self.examples_count)
            .await?;

        let word = self
            .store
            .create_word(NewWord {
                word: text.to_string(),
                codename: codename_for(text),
                part_of_speech: definition.part_of_speech,
                definition: definition.definition,
                examples,
            })
            .await?;

        log::info!("stored word '{}' as {}", word.word, word.id);
        Ok(word)
    }

    async fn ensure_audio(&self, word: Word) -> Word {
        let Some(synthesizer) = &self.synthesizer else {
            return word;
        };
        if word.audio_file.is_some() {
            return word;
        }

        let audio = match synthesizer.synthesize(&word.word).await {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("speech synthesis failed for '{}': {}", word.word, e);
                return word;
            }
        };

        let path = match self
            .media
            .save(&word.codename, word.id, synthesizer.file_extension(), &audio)
            .await
        {
            Ok(path) => path,
            Err(e) => {
                log::warn!("could not store audio for '{}': {}", word.word, e);
                return word;
            }
        };

        match self.store.set_word_audio(word.id, &path).await {
            Ok(updated) => updated,
            Err(e) => {
                log::warn!("could not record audio for '{}': {}", word.word, e);
                word
            }
        }
    }
}
