use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::{
    types::{Json, ToSql},
    Row,
};
use uuid::Uuid;

use super::{
    connection::StoreConfig,
    error::{Error, Result},
    types::{
        LinguisticApiProvider, NewProvider, NewUser, NewWord, User, UserWord, UserWordEntry, Word,
    },
    WordStore,
};

const SCHEMA: &str = include_str!("schema.sql");

const WORD_COLUMNS: &str =
    "id, word, codename, part_of_speech, definition, examples, audio_file, created, updated";

const USER_WORD_COLUMNS: &str =
    "id, user_id, word_id, familiarity_score, last_reviewed, created, updated";

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, api_token, created, updated";

const PROVIDER_COLUMNS: &str =
    "id, name, codename, description, api_key, base_url, is_active, created, updated";

/// Association columns followed by word columns
const ENTRY_SELECT: &str = "SELECT uw.id, uw.user_id, uw.word_id, uw.familiarity_score, \
     uw.last_reviewed, uw.created, uw.updated, \
     w.id, w.word, w.codename, w.part_of_speech, w.definition, w.examples, w.audio_file, \
     w.created, w.updated \
     FROM user_words uw JOIN words w ON w.id = uw.word_id";

const ENTRY_ORDER: &str = "ORDER BY uw.familiarity_score ASC, uw.created ASC, uw.id ASC";

/// Number of association columns in [`ENTRY_SELECT`]
const USER_WORD_WIDTH: usize = 7;

fn word_from_row(row: &Row, offset: usize) -> Word {
    let examples: Json<Vec<String>> = row.get(offset + 5);
    Word {
        id: row.get(offset),
        word: row.get(offset + 1),
        codename: row.get(offset + 2),
        part_of_speech: row.get(offset + 3),
        definition: row.get(offset + 4),
        examples: examples.0,
        audio_file: row.get(offset + 6),
        created: row.get(offset + 7),
        updated: row.get(offset + 8),
    }
}

fn user_word_from_row(row: &Row, offset: usize) -> UserWord {
    UserWord {
        id: row.get(offset),
        user_id: row.get(offset + 1),
        word_id: row.get(offset + 2),
        familiarity_score: row.get(offset + 3),
        last_reviewed: row.get(offset + 4),
        created: row.get(offset + 5),
        updated: row.get(offset + 6),
    }
}

fn entry_from_row(row: &Row) -> UserWordEntry {
    UserWordEntry {
        user_word: user_word_from_row(row, 0),
        word: word_from_row(row, USER_WORD_WIDTH),
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get(0),
        username: row.get(1),
        email: row.get(2),
        first_name: row.get(3),
        last_name: row.get(4),
        api_token: row.get(5),
        created: row.get(6),
        updated: row.get(7),
    }
}

fn provider_from_row(row: &Row) -> LinguisticApiProvider {
    LinguisticApiProvider {
        id: row.get(0),
        name: row.get(1),
        codename: row.get(2),
        description: row.get(3),
        api_key: row.get(4),
        base_url: row.get(5),
        is_active: row.get(6),
        created: row.get(7),
        updated: row.get(8),
    }
}

/// Postgres-backed [`WordStore`]
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Connect, verify the connection and create missing tables
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let pool = config.build_pool()?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Wrap an existing pool without touching the schema
    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes that don't exist yet
    pub async fn migrate(&self) -> Result<()> {
        let conn = self.pool.get().await?;
        conn.batch_execute(SCHEMA).await?;
        log::debug!("store schema is up to date");
        Ok(())
    }

    async fn select_entries(
        &self,
        filter: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<UserWordEntry>> {
        let conn = self.pool.get().await?;
        let sql = format!("{} {} {}", ENTRY_SELECT, filter, ENTRY_ORDER);
        let rows = conn.query(&sql, params).await?;
        Ok(rows.iter().map(entry_from_row).collect())
    }
}

#[async_trait]
impl WordStore for PgStore {
    async fn find_word(&self, word: &str) -> Result<Option<Word>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT {} FROM words WHERE word = $1", WORD_COLUMNS);
        let row = conn.query_opt(&sql, &[&word]).await?;
        Ok(row.map(|r| word_from_row(&r, 0)))
    }

    async fn get_word(&self, id: Uuid) -> Result<Option<Word>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT {} FROM words WHERE id = $1", WORD_COLUMNS);
        let row = conn.query_opt(&sql, &[&id]).await?;
        Ok(row.map(|r| word_from_row(&r, 0)))
    }

    async fn create_word(&self, new_word: NewWord) -> Result<Word> {
        let conn = self.pool.get().await?;

        // A concurrent insert of the same text makes this a no-op
        let sql = format!(
            "INSERT INTO words (id, word, codename, part_of_speech, definition, examples) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT DO NOTHING \
             RETURNING {}",
            WORD_COLUMNS
        );
        let inserted = conn
            .query_opt(
                &sql,
                &[
                    &Uuid::new_v4(),
                    &new_word.word,
                    &new_word.codename,
                    &new_word.part_of_speech,
                    &new_word.definition,
                    &Json(&new_word.examples),
                ],
            )
            .await?;

        if let Some(row) = inserted {
            return Ok(word_from_row(&row, 0));
        }

        let select = format!("SELECT {} FROM words WHERE word = $1", WORD_COLUMNS);
        match conn.query_opt(&select, &[&new_word.word]).await? {
            Some(row) => Ok(word_from_row(&row, 0)),
            None => Err(Error::ConflictError(format!(
                "codename '{}' is used by another word",
                new_word.codename
            ))),
        }
    }

    async fn set_word_audio(&self, id: Uuid, audio_file: &str) -> Result<Word> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "UPDATE words SET audio_file = $2, updated = now() WHERE id = $1 RETURNING {}",
            WORD_COLUMNS
        );
        conn.query_opt(&sql, &[&id, &audio_file])
            .await?
            .map(|r| word_from_row(&r, 0))
            .ok_or_else(|| Error::NotFoundError(format!("word {}", id)))
    }

    async fn get_or_create_user_word(
        &self,
        user_id: Uuid,
        word_id: Uuid,
    ) -> Result<(UserWord, bool)> {
        let conn = self.pool.get().await?;

        let insert = format!(
            "INSERT INTO user_words (user_id, word_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, word_id) DO NOTHING \
             RETURNING {}",
            USER_WORD_COLUMNS
        );
        if let Some(row) = conn.query_opt(&insert, &[&user_id, &word_id]).await? {
            return Ok((user_word_from_row(&row, 0), true));
        }

        let select = format!(
            "SELECT {} FROM user_words WHERE user_id = $1 AND word_id = $2",
            USER_WORD_COLUMNS
        );
        let row = conn.query_one(&select, &[&user_id, &word_id]).await?;
        Ok((user_word_from_row(&row, 0), false))
    }

    async fn find_user_word(&self, user_id: Uuid, word_id: Uuid) -> Result<Option<UserWord>> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM user_words WHERE user_id = $1 AND word_id = $2",
            USER_WORD_COLUMNS
        );
        let row = conn.query_opt(&sql, &[&user_id, &word_id]).await?;
        Ok(row.map(|r| user_word_from_row(&r, 0)))
    }

    async fn get_user_word(&self, user_id: Uuid, id: i64) -> Result<Option<UserWordEntry>> {
        let entries = self
            .select_entries("WHERE uw.user_id = $1 AND uw.id = $2", &[&user_id, &id])
            .await?;
        Ok(entries.into_iter().next())
    }

    async fn delete_user_word(&self, user_id: Uuid, word_id: Uuid) -> Result<bool> {
        let conn = self.pool.get().await?;
        let deleted = conn
            .execute(
                "DELETE FROM user_words WHERE user_id = $1 AND word_id = $2",
                &[&user_id, &word_id],
            )
            .await?;
        Ok(deleted > 0)
    }

    async fn list_user_words(&self, user_id: Uuid) -> Result<Vec<UserWordEntry>> {
        self.select_entries("WHERE uw.user_id = $1", &[&user_id]).await
    }

    async fn least_familiar_user_word(&self, user_id: Uuid) -> Result<Option<UserWordEntry>> {
        let conn = self.pool.get().await?;
        let sql = format!("{} WHERE uw.user_id = $1 {} LIMIT 1", ENTRY_SELECT, ENTRY_ORDER);
        let row = conn.query_opt(&sql, &[&user_id]).await?;
        Ok(row.as_ref().map(entry_from_row))
    }

    async fn record_review(
        &self,
        id: i64,
        incorrect: bool,
        at: DateTime<Utc>,
    ) -> Result<UserWord> {
        let conn = self.pool.get().await?;
        let increment: i32 = if incorrect { 1 } else { 0 };
        let sql = format!(
            "UPDATE user_words \
             SET familiarity_score = familiarity_score + $2, last_reviewed = $3, updated = now() \
             WHERE id = $1 \
             RETURNING {}",
            USER_WORD_COLUMNS
        );
        conn.query_opt(&sql, &[&id, &increment, &at])
            .await?
            .map(|r| user_word_from_row(&r, 0))
            .ok_or_else(|| Error::NotFoundError(format!("user word {}", id)))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO users (id, username, email, first_name, last_name, api_token) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {}",
            USER_COLUMNS
        );
        let row = conn
            .query_one(
                &sql,
                &[
                    &Uuid::new_v4(),
                    &new_user.username,
                    &new_user.email,
                    &new_user.first_name,
                    &new_user.last_name,
                    &Uuid::new_v4(),
                ],
            )
            .await?;
        Ok(user_from_row(&row))
    }

    async fn find_user_by_token(&self, token: Uuid) -> Result<Option<User>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE api_token = $1", USER_COLUMNS);
        let row = conn.query_opt(&sql, &[&token]).await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn upsert_provider(&self, provider: NewProvider) -> Result<LinguisticApiProvider> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO linguistic_api_providers \
                 (id, name, codename, description, api_key, base_url, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (codename) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 description = EXCLUDED.description, \
                 api_key = EXCLUDED.api_key, \
                 base_url = EXCLUDED.base_url, \
                 is_active = EXCLUDED.is_active, \
                 updated = now() \
             RETURNING {}",
            PROVIDER_COLUMNS
        );
        let row = conn
            .query_one(
                &sql,
                &[
                    &Uuid::new_v4(),
                    &provider.name,
                    &provider.codename,
                    &provider.description,
                    &provider.api_key,
                    &provider.base_url,
                    &provider.is_active,
                ],
            )
            .await?;
        Ok(provider_from_row(&row))
    }

    async fn list_providers(&self, active_only: bool) -> Result<Vec<LinguisticApiProvider>> {
        let conn = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM linguistic_api_providers \
             WHERE ($1 = FALSE OR is_active) \
             ORDER BY name",
            PROVIDER_COLUMNS
        );
        let rows = conn.query(&sql, &[&active_only]).await?;
        Ok(rows.iter().map(provider_from_row).collect())
    }
}
