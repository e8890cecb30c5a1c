use serde::Deserialize;

use crate::error::AppError;
use crate::store::{self, NewUser, User};

use super::VocabularyService;

const USERNAME_MIN: usize = 4;
const USERNAME_MAX: usize = 36;
const EMAIL_MAX: usize = 254;
const NAME_MAX: usize = 128;

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Normalize and check a registration
///
/// Usernames and emails are lowercased. A blank last name is dropped.
pub fn validate_registration(registration: Registration) -> Result<NewUser, AppError> {
    let username = registration.username.trim().to_lowercase();
    let length = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
        return Err(AppError::Validation(format!(
            "Username must be {} to {} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@.+-_".contains(c))
    {
        return Err(AppError::Validation(
            "Username may only contain letters, digits and @/./+/-/_".to_string(),
        ));
    }

    let email = registration.email.trim().to_lowercase();
    if email.len() > EMAIL_MAX {
        return Err(AppError::Validation(format!(
            "Email must be at most {} characters",
            EMAIL_MAX
        )));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(AppError::Validation("Enter a valid email address".to_string())),
    }

    let first_name = registration.first_name.trim().to_string();
    if first_name.is_empty() {
        return Err(AppError::Validation("First name is required".to_string()));
    }
    let last_name = registration
        .last_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    if first_name.chars().count() > NAME_MAX
        || last_name.as_ref().is_some_and(|n| n.chars().count() > NAME_MAX)
    {
        return Err(AppError::Validation(format!(
            "Names must be at most {} characters",
            NAME_MAX
        )));
    }

    Ok(NewUser {
        username,
        email,
        first_name,
        last_name,
    })
}

impl VocabularyService {
    /// Create an account and its API token
    pub async fn register(&self, registration: Registration) -> Result<User, AppError> {
        let new_user = validate_registration(registration)?;

        match self.store.create_user(new_user).await {
            Ok(user) => {
                log::info!("registered user {}", user.username);
                Ok(user)
            }
            Err(store::Error::ConflictError(detail)) => {
                log::debug!("registration conflict: {}", detail);
                Err(AppError::Conflict(
                    "A user with that username or email already exists".to_string(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }
}
