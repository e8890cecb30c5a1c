//! Vocabulary flows: lookup, collection, quiz and accounts
//!
//! Every operation takes the calling user explicitly; nothing here reads
//! request state.

pub mod accounts;
pub mod collection;
pub mod lookup;
pub mod quiz;

use std::sync::Arc;

use crate::linguistic::LinguisticModel;
use crate::speech::{AudioStorage, SpeechSynthesizer};
use crate::store::WordStore;

pub use accounts::{validate_registration, Registration};
pub use collection::{SaveOutcome, UserWordView};
pub use lookup::{codename_for, normalize_word, WordView, MAX_WORD_LENGTH};
pub use quiz::{next_quiz_url, QuizState, QuizWord, RequestOrigin, SubmitOutcome, QUIZ_PATH};

/// Number of example sentences requested when none is configured
pub const DEFAULT_EXAMPLES_COUNT: usize = 2;

/// Shared state behind every request handler
#[derive(Clone)]
pub struct VocabularyService {
    store: Arc<dyn WordStore>,
    linguist: Arc<dyn LinguisticModel>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    media: AudioStorage,
    examples_count: usize,
    public_url: Option<String>,
}

impl VocabularyService {
    /// Service without audio synthesis, serving media under `/media/`
    pub fn new(store: Arc<dyn WordStore>, linguist: Arc<dyn LinguisticModel>) -> Self {
        Self {
            store,
            linguist,
            synthesizer: None,
            media: AudioStorage::new("media", "/media/"),
            examples_count: DEFAULT_EXAMPLES_COUNT,
            public_url: None,
        }
    }

    /// Enable audio synthesis (builder pattern)
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Set where audio files are written and served from (builder pattern)
    pub fn with_media(mut self, media: AudioStorage) -> Self {
        self.media = media;
        self
    }

    /// Set the number of example sentences per new word (builder pattern)
    pub fn with_examples_count(mut self, examples_count: usize) -> Self {
        self.examples_count = examples_count;
        self
    }

    /// Set the externally visible base URL used for links (builder pattern)
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = Some(public_url.into());
        self
    }

    pub fn store(&self) -> &Arc<dyn WordStore> {
        &self.store
    }

    pub(crate) fn audio_url(&self, audio_file: Option<&str>) -> Option<String> {
        audio_file.map(|path| self.media.url_for(path))
    }
}
