// Request and response bodies

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::linguistic::Quiz;
use crate::service::{QuizState, QuizWord, UserWordView};
use crate::store::User;

// Forms post numbers as strings
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    String(String),
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// POST /lookup
#[derive(Debug, Clone, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub word: String,
}

// POST /save and POST /remove
#[derive(Debug, Clone, Deserialize)]
pub struct WordIdRequest {
    pub word_id: Uuid,
}

// POST /quiz/submit
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub user_word_id: i64,
    pub selected_answer: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MyWordsResponse {
    pub user_words: Vec<UserWordView>,
}

// GET /quiz
#[derive(Debug, Clone, Serialize, Default)]
pub struct QuizResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<QuizWord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_word_id: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_words: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<QuizState> for QuizResponse {
    fn from(state: QuizState) -> Self {
        match state {
            QuizState::NoWords => QuizResponse {
                no_words: true,
                ..Default::default()
            },
            QuizState::Unavailable { message } => QuizResponse {
                no_words: true,
                error: Some(message),
                ..Default::default()
            },
            QuizState::Ready {
                user_word_id,
                word,
                quiz,
            } => QuizResponse {
                word: Some(word),
                quiz: Some(quiz),
                user_word_id: Some(user_word_id),
                ..Default::default()
            },
        }
    }
}

// POST /accounts/register
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub token: Uuid,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            token: user.api_token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn submit_request_accepts_string_or_number_id() {
        let from_number: SubmitAnswerRequest = serde_json::from_value(json!({
            "user_word_id": 7,
            "selected_answer": "a",
            "correct_answer": "b"
        }))
        .unwrap();
        assert_eq!(from_number.user_word_id, 7);

        let from_string: SubmitAnswerRequest = serde_json::from_value(json!({
            "user_word_id": " 7 ",
            "selected_answer": "a",
            "correct_answer": "b"
        }))
        .unwrap();
        assert_eq!(from_string.user_word_id, 7);

        let invalid = serde_json::from_value::<SubmitAnswerRequest>(json!({
            "user_word_id": "seven",
            "selected_answer": "a",
            "correct_answer": "b"
        }));
        assert!(invalid.is_err());
    }

    #[test]
    fn quiz_response_shapes() {
        let empty = serde_json::to_value(QuizResponse::from(QuizState::NoWords)).unwrap();
        assert_eq!(empty, json!({ "no_words": true }));

        let unavailable = serde_json::to_value(QuizResponse::from(QuizState::Unavailable {
            message: "Could not generate a question.".to_string(),
        }))
        .unwrap();
        assert_eq!(
            unavailable,
            json!({ "no_words": true, "error": "Could not generate a question." })
        );

        let ready = serde_json::to_value(QuizResponse::from(QuizState::Ready {
            user_word_id: 3,
            word: QuizWord {
                id: Uuid::nil(),
                word: "moot".to_string(),
                part_of_speech: "adjective".to_string(),
                audio_file_url: None,
            },
            quiz: Quiz {
                question: "What does 'moot' mean?".to_string(),
                options: vec!["Debatable".to_string(), "Silent".to_string()],
                correct_answer: "Debatable".to_string(),
            },
        }))
        .unwrap();
        assert_eq!(ready["user_word_id"], 3);
        assert_eq!(ready["word"]["word"], "moot");
        assert_eq!(ready["quiz"]["options"][1], "Silent");
        assert!(ready.get("no_words").is_none());
    }
}
