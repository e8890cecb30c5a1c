use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A word or phrase with its generated definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,

    /// Normalized (trimmed, lowercase) text
    pub word: String,

    /// `word` with spaces replaced by underscores
    pub codename: String,

    /// May be empty when the model did not name it
    pub part_of_speech: String,

    pub definition: String,

    /// Example sentences, in generation order
    pub examples: Vec<String>,

    /// Audio path relative to the media root
    pub audio_file: Option<String>,

    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Data for creating a [`Word`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewWord {
    pub word: String,
    pub codename: String,
    pub part_of_speech: String,
    pub definition: String,
    pub examples: Vec<String>,
}

/// A word saved by a user, with learning progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWord {
    pub id: i64,
    pub user_id: Uuid,
    pub word_id: Uuid,

    /// Number of wrong quiz answers
    pub familiarity_score: i32,

    pub last_reviewed: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A [`UserWord`] joined with its [`Word`]
#[derive(Debug, Clone, PartialEq)]
pub struct UserWordEntry {
    pub user_word: UserWord,
    pub word: Word,
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,

    /// Bearer token for API requests
    pub api_token: Uuid,

    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Validated data for creating a [`User`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// Stored settings record for a linguistic API vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticApiProvider {
    pub id: Uuid,
    pub name: String,
    pub codename: String,
    pub description: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub is_active: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Data for creating or updating a [`LinguisticApiProvider`], keyed by codename
#[derive(Debug, Clone, PartialEq)]
pub struct NewProvider {
    pub name: String,
    pub codename: String,
    pub description: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub is_active: bool,
}

impl NewProvider {
    pub fn new(name: impl Into<String>, codename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codename: codename.into(),
            description: None,
            api_key: None,
            base_url: None,
            is_active: true,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
