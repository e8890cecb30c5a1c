//! The linguistic capability interface and its LLM-backed implementation

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::llm::{
    FinishReason, GenerateRequest, GenerateResponse, GenerationConfig, LlmError, LlmProvider,
};

use super::parser::{decode_definition, decode_examples, parse_quiz, ParsedQuiz};
use super::prompts;

/// Definition of a word as produced by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordDefinition {
    pub word: String,
    pub part_of_speech: String,
    pub definition: String,
}

/// Everything the vocabulary flows need from a language model
#[async_trait]
pub trait LinguisticModel: Send + Sync {
    /// Learner-friendly definition of `word`
    async fn get_word_definition(&self, word: &str) -> Result<WordDefinition, LlmError>;

    /// Up to `count` example sentences using `word`
    async fn get_word_examples(&self, word: &str, count: usize) -> Result<Vec<String>, LlmError>;

    /// A multiple choice question about `word`; validity is up to the caller
    async fn generate_quiz_options(&self, word: &str) -> Result<ParsedQuiz, LlmError>;
}

/// [`LinguisticModel`] that sends each prompt as a single user message
pub struct LlmLinguisticModel {
    provider: Arc<dyn LlmProvider>,
    config: GenerationConfig,
}

impl LlmLinguisticModel {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            config: GenerationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Name of the underlying vendor
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn ask(&self, prompt: String) -> Result<GenerateResponse, LlmError> {
        let request = GenerateRequest::from_prompt(prompt).with_config(self.config.clone());
        let response = self.provider.generate(request).await?;

        if let Some(usage) = response.usage {
            log::debug!(
                "{} used {} prompt + {} completion tokens",
                self.provider.name(),
                usage.input_tokens,
                usage.output_tokens
            );
        }

        Ok(response)
    }

    /// Text of a reply that must be complete to be stored
    fn complete_text(&self, response: GenerateResponse) -> Result<String, LlmError> {
        match response.finish_reason {
            Some(FinishReason::Length) => Err(LlmError::InvalidResponse(format!(
                "{} reply was cut off at the token limit",
                self.provider.name()
            ))),
            Some(FinishReason::ContentFilter) => Err(LlmError::InvalidResponse(format!(
                "{} reply was blocked by its content filter",
                self.provider.name()
            ))),
            _ => Ok(response.text),
        }
    }
}

#[async_trait]
impl LinguisticModel for LlmLinguisticModel {
    async fn get_word_definition(&self, word: &str) -> Result<WordDefinition, LlmError> {
        let response = self.ask(prompts::word_definition(word)).await?;
        let decoded = decode_definition(&self.complete_text(response)?);
        if decoded.definition.is_empty() {
            return Err(LlmError::InvalidResponse(format!(
                "{} returned no definition for '{}'",
                self.provider.name(),
                word
            )));
        }

        Ok(WordDefinition {
            word: word.to_string(),
            part_of_speech: decoded.part_of_speech,
            definition: decoded.definition,
        })
    }

    async fn get_word_examples(&self, word: &str, count: usize) -> Result<Vec<String>, LlmError> {
        let response = self.ask(prompts::word_examples(word, count)).await?;
        let mut examples = decode_examples(&self.complete_text(response)?);
        examples.truncate(count);
        Ok(examples)
    }

    async fn generate_quiz_options(&self, word: &str) -> Result<ParsedQuiz, LlmError> {
        let response = self.ask(prompts::word_quiz(word)).await?;
        Ok(parse_quiz(&response.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{EventStream, StreamEvent};
    use std::sync::Mutex;

    /// Replies with a fixed text, split into two deltas, and records prompts
    struct CannedProvider {
        reply: String,
        finish_reason: FinishReason,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn new(reply: &str) -> Arc<Self> {
            Self::finishing(reply, FinishReason::Stop)
        }

        fn finishing(reply: &str, finish_reason: FinishReason) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                finish_reason,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push(request.messages[0].content.clone());

            let middle = self.reply.len() / 2;
            let split = (0..=middle)
                .rev()
                .find(|i| self.reply.is_char_boundary(*i))
                .unwrap_or(0);
            let (head, tail) = self.reply.split_at(split);

            let events: Vec<Result<StreamEvent, LlmError>> = vec![
                Ok(StreamEvent::MessageStart { id: "m".to_string() }),
                Ok(StreamEvent::TextDelta { text: head.to_string() }),
                Ok(StreamEvent::TextDelta { text: tail.to_string() }),
                Ok(StreamEvent::MessageEnd {
                    finish_reason: self.finish_reason.clone(),
                    usage: None,
                }),
            ];
            Ok(Box::pin(futures::stream::iter(events)))
        }
    }

    #[tokio::test]
    async fn definition_uses_definition_prompt() {
        let provider = CannedProvider::new(
            r#"{"definition": "Found everywhere.", "part_of_speech": "adjective"}"#,
        );
        let model = LlmLinguisticModel::new(provider.clone());

        let definition = model.get_word_definition("ubiquitous").await.unwrap();
        assert_eq!(
            definition,
            WordDefinition {
                word: "ubiquitous".to_string(),
                part_of_speech: "adjective".to_string(),
                definition: "Found everywhere.".to_string(),
            }
        );

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Define the word or phrase: 'ubiquitous'"));
    }

    #[tokio::test]
    async fn examples_are_capped_at_count() {
        let provider = CannedProvider::new(r#"["One.", "Two.", "Three."]"#);
        let model = LlmLinguisticModel::new(provider);

        let examples = model.get_word_examples("moot", 2).await.unwrap();
        assert_eq!(examples, vec!["One.", "Two."]);
    }

    #[tokio::test]
    async fn quiz_reply_is_parsed() {
        let provider = CannedProvider::new(
            "Question: What does the word 'moot' mean?\nOptions:\n- Debatable\n- Silent\n- Hungry\n- Bright\nCorrect Answer: Debatable",
        );
        let model = LlmLinguisticModel::new(provider);

        let quiz = model.generate_quiz_options("moot").await.unwrap();
        assert_eq!(quiz.options.len(), 4);
        assert_eq!(quiz.correct_answer.as_deref(), Some("Debatable"));
    }

    #[tokio::test]
    async fn empty_definition_is_an_error() {
        let model = LlmLinguisticModel::new(CannedProvider::new("  "));
        let result = model.get_word_definition("ubiquitous").await;
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));

        let model = LlmLinguisticModel::new(CannedProvider::new(
            r#"{"definition": "", "part_of_speech": "adjective"}"#,
        ));
        let result = model.get_word_definition("ubiquitous").await;
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn truncated_replies_are_errors() {
        let provider =
            CannedProvider::finishing(r#"{"definition": "Found every"#, FinishReason::Length);
        let model = LlmLinguisticModel::new(provider);
        assert!(matches!(
            model.get_word_definition("ubiquitous").await,
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(matches!(
            model.get_word_examples("ubiquitous", 2).await,
            Err(LlmError::InvalidResponse(_))
        ));
    }
}
