//! Builds the linguistic model for the configured vendor

use std::sync::Arc;

use crate::llm::{create_provider, LlmError, LlmSettings, ProviderKind};

use super::model::LlmLinguisticModel;

/// Create the linguistic model selected by `settings.provider`
///
/// Credentials come from `settings`; stored provider records are not
/// consulted.
pub fn create_linguistic_model(settings: &LlmSettings) -> Result<LlmLinguisticModel, LlmError> {
    create_linguistic_model_for(settings.provider, settings)
}

/// Create the linguistic model for an explicit vendor
pub fn create_linguistic_model_for(
    kind: ProviderKind,
    settings: &LlmSettings,
) -> Result<LlmLinguisticModel, LlmError> {
    let provider = create_provider(kind, settings)?;
    log::info!("Using {} for word definitions and quizzes", kind);

    Ok(LlmLinguisticModel::new(Arc::from(provider)).with_config(settings.generation.clone()))
}

/// Create the linguistic model by vendor name, e.g. `"deepseek"`
pub fn create_linguistic_model_by_name(
    name: &str,
    settings: &LlmSettings,
) -> Result<LlmLinguisticModel, LlmError> {
    let kind: ProviderKind = name.parse()?;
    create_linguistic_model_for(kind, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_keys() -> LlmSettings {
        let mut settings = LlmSettings::default();
        settings.deepseek.api_key = Some("sk-test".to_string());
        settings.gigachat.auth_key = Some("a2V5".to_string());
        settings
    }

    #[test]
    fn selects_configured_provider() {
        let mut settings = settings_with_keys();
        settings.provider = ProviderKind::DeepSeek;

        let model = create_linguistic_model(&settings).unwrap();
        assert_eq!(model.provider_name(), "deepseek");
    }

    #[test]
    fn selects_by_name_case_insensitively() {
        let settings = settings_with_keys();

        let model = create_linguistic_model_by_name("GigaChat", &settings).unwrap();
        assert_eq!(model.provider_name(), "gigachat");

        let model = create_linguistic_model_by_name("DEEPSEEK", &settings).unwrap();
        assert_eq!(model.provider_name(), "deepseek");
    }

    #[test]
    fn unknown_name_is_an_error() {
        let result = create_linguistic_model_by_name("yandexgpt", &settings_with_keys());
        assert!(matches!(result, Err(LlmError::InvalidRequest(_))));
    }

    #[test]
    fn missing_credentials_are_an_error() {
        let result = create_linguistic_model(&LlmSettings::default());
        assert!(matches!(result, Err(LlmError::AuthenticationError(_))));
    }
}
