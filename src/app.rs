//! Service assembly from configuration

use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::linguistic::{create_linguistic_model, LinguisticModel};
use crate::llm::LlmError;
use crate::service::VocabularyService;
use crate::speech::{AudioStorage, OpenAiSpeechClient, SpeechError, SpeechSynthesizer};
use crate::store::{self, MemoryStore, PgStore, StoreConfig, WordStore};

/// Errors that stop the service from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("store setup failed: {0}")]
    Store(#[from] store::Error),

    #[error("language model setup failed: {0}")]
    Llm(#[from] LlmError),

    #[error("speech setup failed: {0}")]
    Speech(#[from] SpeechError),
}

/// Open the store named by `DATABASE_URL`, or an in-memory one
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn WordStore>, StartupError> {
    match &config.database_url {
        Some(url) => {
            let store_config =
                StoreConfig::from_connection_string(url)?.with_max_pool_size(config.pool_size);
            let store = PgStore::connect(store_config).await?;
            log::info!("connected to Postgres (pool size {})", config.pool_size);
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL is not set; data is kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Log a warning when the selected provider has no active record
///
/// Records are informational; provider selection comes from configuration.
pub async fn check_provider_records(store: &dyn WordStore, config: &AppConfig) {
    let selected = config.llm.provider.as_str();
    match store.list_providers(true).await {
        Ok(records) if records.iter().any(|r| r.codename == selected) => {
            log::debug!("provider record for {} is active", selected);
        }
        Ok(_) => log::warn!("no active provider record for '{}'", selected),
        Err(e) => log::warn!("could not list provider records: {}", e),
    }
}

/// Build the service with the store, language model and optional speech
pub async fn build_service(config: &AppConfig) -> Result<VocabularyService, StartupError> {
    let store = open_store(config).await?;
    check_provider_records(store.as_ref(), config).await;

    let linguist: Arc<dyn LinguisticModel> = Arc::new(create_linguistic_model(&config.llm)?);

    let media = AudioStorage::new(config.media_root.clone(), config.media_url.clone());
    let mut service = VocabularyService::new(store, linguist)
        .with_media(media)
        .with_examples_count(config.examples_count);

    if let Some(public_url) = &config.public_url {
        service = service.with_public_url(public_url.clone());
    }

    match &config.speech {
        Some(settings) => {
            let synthesizer: Arc<dyn SpeechSynthesizer> =
                Arc::new(OpenAiSpeechClient::new(settings.clone())?);
            service = service.with_synthesizer(synthesizer);
            log::info!("speech synthesis enabled ({} / {})", settings.model, settings.voice);
        }
        None => log::info!("TTS_API_KEY is not set; words will have no audio"),
    }

    Ok(service)
}
