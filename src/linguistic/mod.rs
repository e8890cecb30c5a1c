//! Word definitions, examples and quizzes from a language model
//!
//! [`LinguisticModel`] is the capability the vocabulary flows depend on.
//! [`LlmLinguisticModel`] implements it over any [`LlmProvider`]
//! by formatting a prompt template and decoding the reply.
//!
//! [`LlmProvider`]: crate::llm::LlmProvider

pub mod factory;
pub mod model;
pub mod parser;
pub mod prompts;

pub use factory::{
    create_linguistic_model, create_linguistic_model_by_name, create_linguistic_model_for,
};
pub use model::{LinguisticModel, LlmLinguisticModel, WordDefinition};
pub use parser::{parse_quiz, ParsedQuiz, Quiz};
