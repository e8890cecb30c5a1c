use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    error::{Error, Result},
    types::{
        LinguisticApiProvider, NewProvider, NewUser, NewWord, User, UserWord, UserWordEntry, Word,
    },
    WordStore,
};

#[derive(Default)]
struct Tables {
    words: HashMap<Uuid, Word>,
    user_words: BTreeMap<i64, UserWord>,
    users: HashMap<Uuid, User>,
    providers: HashMap<Uuid, LinguisticApiProvider>,
    last_user_word_id: i64,
}

impl Tables {
    fn entry(&self, user_word: &UserWord) -> Option<UserWordEntry> {
        let word = self.words.get(&user_word.word_id)?;
        Some(UserWordEntry {
            user_word: user_word.clone(),
            word: word.clone(),
        })
    }

    fn entries_for(&self, user_id: Uuid) -> Vec<UserWordEntry> {
        let mut entries: Vec<UserWordEntry> = self
            .user_words
            .values()
            .filter(|uw| uw.user_id == user_id)
            .filter_map(|uw| self.entry(uw))
            .collect();

        entries.sort_by(|a, b| {
            let (a, b) = (&a.user_word, &b.user_word);
            a.familiarity_score
                .cmp(&b.familiarity_score)
                .then(a.created.cmp(&b.created))
                .then(a.id.cmp(&b.id))
        });
        entries
    }
}

/// In-process [`WordStore`]
///
/// Holds all rows behind a single lock. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WordStore for MemoryStore {
    async fn find_word(&self, word: &str) -> Result<Option<Word>> {
        let tables = self.tables.read().await;
        Ok(tables.words.values().find(|w| w.word == word).cloned())
    }

    async fn get_word(&self, id: Uuid) -> Result<Option<Word>> {
        Ok(self.tables.read().await.words.get(&id).cloned())
    }

    async fn create_word(&self, new_word: NewWord) -> Result<Word> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.words.values().find(|w| w.word == new_word.word) {
            return Ok(existing.clone());
        }
        if tables.words.values().any(|w| w.codename == new_word.codename) {
            return Err(Error::ConflictError(format!(
                "codename '{}' is used by another word",
                new_word.codename
            )));
        }

        let now = Utc::now();
        let word = Word {
            id: Uuid::new_v4(),
            word: new_word.word,
            codename: new_word.codename,
            part_of_speech: new_word.part_of_speech,
            definition: new_word.definition,
            examples: new_word.examples,
            audio_file: None,
            created: now,
            updated: now,
        };
        tables.words.insert(word.id, word.clone());
        Ok(word)
    }

    async fn set_word_audio(&self, id: Uuid, audio_file: &str) -> Result<Word> {
        let mut tables = self.tables.write().await;
        let word = tables
            .words
            .get_mut(&id)
            .ok_or_else(|| Error::NotFoundError(format!("word {}", id)))?;
        word.audio_file = Some(audio_file.to_string());
        word.updated = Utc::now();
        Ok(word.clone())
    }

    async fn get_or_create_user_word(
        &self,
        user_id: Uuid,
        word_id: Uuid,
    ) -> Result<(UserWord, bool)> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .user_words
            .values()
            .find(|uw| uw.user_id == user_id && uw.word_id == word_id)
        {
            return Ok((existing.clone(), false));
        }
        if !tables.words.contains_key(&word_id) {
            return Err(Error::NotFoundError(format!("word {}", word_id)));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(Error::NotFoundError(format!("user {}", user_id)));
        }

        tables.last_user_word_id += 1;
        let now = Utc::now();
        let user_word = UserWord {
            id: tables.last_user_word_id,
            user_id,
            word_id,
            familiarity_score: 0,
            last_reviewed: None,
            created: now,
            updated: now,
        };
        tables.user_words.insert(user_word.id, user_word.clone());
        Ok((user_word, true))
    }

    async fn find_user_word(&self, user_id: Uuid, word_id: Uuid) -> Result<Option<UserWord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_words
            .values()
            .find(|uw| uw.user_id == user_id && uw.word_id == word_id)
            .cloned())
    }

    async fn get_user_word(&self, user_id: Uuid, id: i64) -> Result<Option<UserWordEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_words
            .get(&id)
            .filter(|uw| uw.user_id == user_id)
            .and_then(|uw| tables.entry(uw)))
    }

    async fn delete_user_word(&self, user_id: Uuid, word_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let id = tables
            .user_words
            .values()
            .find(|uw| uw.user_id == user_id && uw.word_id == word_id)
            .map(|uw| uw.id);

        Ok(match id {
            Some(id) => tables.user_words.remove(&id).is_some(),
            None => false,
        })
    }

    async fn list_user_words(&self, user_id: Uuid) -> Result<Vec<UserWordEntry>> {
        Ok(self.tables.read().await.entries_for(user_id))
    }

    async fn least_familiar_user_word(&self, user_id: Uuid) -> Result<Option<UserWordEntry>> {
        Ok(self
            .tables
            .read()
            .await
            .entries_for(user_id)
            .into_iter()
            .next())
    }

    async fn record_review(
        &self,
        id: i64,
        incorrect: bool,
        at: DateTime<Utc>,
    ) -> Result<UserWord> {
        let mut tables = self.tables.write().await;
        let user_word = tables
            .user_words
            .get_mut(&id)
            .ok_or_else(|| Error::NotFoundError(format!("user word {}", id)))?;

        if incorrect {
            user_word.familiarity_score += 1;
        }
        user_word.last_reviewed = Some(at);
        user_word.updated = Utc::now();
        Ok(user_word.clone())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == new_user.username) {
            return Err(Error::ConflictError(format!(
                "username '{}' is taken",
                new_user.username
            )));
        }
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(Error::ConflictError(format!(
                "email '{}' is taken",
                new_user.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            api_token: Uuid::new_v4(),
            created: now,
            updated: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_token(&self, token: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.api_token == token).cloned())
    }

    async fn upsert_provider(&self, provider: NewProvider) -> Result<LinguisticApiProvider> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let existing = tables
            .providers
            .values()
            .find(|p| p.codename == provider.codename)
            .map(|p| (p.id, p.created));

        if tables
            .providers
            .values()
            .any(|p| p.name == provider.name && p.codename != provider.codename)
        {
            return Err(Error::ConflictError(format!(
                "provider name '{}' is taken",
                provider.name
            )));
        }

        let (id, created) = existing.unwrap_or((Uuid::new_v4(), now));
        let record = LinguisticApiProvider {
            id,
            name: provider.name,
            codename: provider.codename,
            description: provider.description,
            api_key: provider.api_key,
            base_url: provider.base_url,
            is_active: provider.is_active,
            created,
            updated: now,
        };
        tables.providers.insert(id, record.clone());
        Ok(record)
    }

    async fn list_providers(&self, active_only: bool) -> Result<Vec<LinguisticApiProvider>> {
        let tables = self.tables.read().await;
        let mut providers: Vec<LinguisticApiProvider> = tables
            .providers
            .values()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect();
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(providers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_word(word: &str) -> NewWord {
        NewWord {
            word: word.to_string(),
            codename: word.replace(' ', "_"),
            part_of_speech: "noun".to_string(),
            definition: format!("Definition of {}", word),
            examples: vec![format!("An example with {}.", word)],
        }
    }

    async fn user(store: &MemoryStore, username: &str) -> User {
        store
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                first_name: "Test".to_string(),
                last_name: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_word_returns_existing_row() {
        let store = MemoryStore::new();
        let first = store.create_word(new_word("ubiquitous")).await.unwrap();
        let second = store.create_word(new_word("ubiquitous")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(
            store.find_word("ubiquitous").await.unwrap().map(|w| w.id),
            Some(first.id)
        );
    }

    #[tokio::test]
    async fn create_word_rejects_codename_collision() {
        let store = MemoryStore::new();
        store.create_word(new_word("get over")).await.unwrap();

        // Different text, same codename
        assert!(matches!(
            store.create_word(new_word("get_over")).await,
            Err(Error::ConflictError(_))
        ));
    }

    #[tokio::test]
    async fn user_words_are_ordered_by_familiarity_then_age() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;

        let mut ids = Vec::new();
        for text in ["moot", "terse", "ubiquitous"] {
            let word = store.create_word(new_word(text)).await.unwrap();
            let (uw, created) = store.get_or_create_user_word(alice.id, word.id).await.unwrap();
            assert!(created);
            ids.push(uw.id);
        }

        // "moot" gets a wrong answer and moves to the back
        store.record_review(ids[0], true, Utc::now()).await.unwrap();

        let listed: Vec<String> = store
            .list_user_words(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.word.word)
            .collect();
        assert_eq!(listed, vec!["terse", "ubiquitous", "moot"]);

        let least = store.least_familiar_user_word(alice.id).await.unwrap().unwrap();
        assert_eq!(least.word.word, "terse");
    }

    #[tokio::test]
    async fn user_word_lookups_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bobby").await;
        let word = store.create_word(new_word("terse")).await.unwrap();
        let (uw, _) = store.get_or_create_user_word(alice.id, word.id).await.unwrap();

        assert!(store.get_user_word(alice.id, uw.id).await.unwrap().is_some());
        assert!(store.get_user_word(bob.id, uw.id).await.unwrap().is_none());
        assert!(!store.delete_user_word(bob.id, word.id).await.unwrap());
        assert!(store.delete_user_word(alice.id, word.id).await.unwrap());
        assert!(store.list_user_words(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        user(&store, "alice").await;

        let result = store
            .create_user(NewUser {
                username: "alice".to_string(),
                email: "other@example.com".to_string(),
                first_name: "Alice".to_string(),
                last_name: None,
            })
            .await;
        assert!(matches!(result, Err(Error::ConflictError(_))));
    }

    #[tokio::test]
    async fn upsert_provider_updates_by_codename() {
        let store = MemoryStore::new();
        let first = store
            .upsert_provider(NewProvider::new("GigaChat", "gigachat"))
            .await
            .unwrap();
        store
            .upsert_provider(NewProvider::new("DeepSeek", "deepseek").inactive())
            .await
            .unwrap();

        let updated = store
            .upsert_provider(
                NewProvider::new("GigaChat", "gigachat").with_base_url("https://example.com"),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.base_url.as_deref(), Some("https://example.com"));

        let all = store.list_providers(false).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "DeepSeek");

        let active = store.list_providers(true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].codename, "gigachat");
    }
}
