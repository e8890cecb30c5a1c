//! Bearer token authentication filters

use std::sync::Arc;

use uuid::Uuid;
use warp::{Filter, Rejection};

use crate::error::AppError;
use crate::store::{User, WordStore};

/// Extract the token from an `Authorization: Bearer <uuid>` header value
pub fn parse_bearer(header: &str) -> Option<Uuid> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Uuid::parse_str(token.trim()).ok()
}

async fn resolve_user(
    store: Arc<dyn WordStore>,
    header: Option<String>,
) -> Result<Option<User>, Rejection> {
    let Some(header) = header else {
        return Ok(None);
    };

    let token = parse_bearer(&header).ok_or_else(|| warp::reject::custom(AppError::Unauthorized))?;
    let user = store
        .find_user_by_token(token)
        .await
        .map_err(|e| warp::reject::custom(AppError::from(e)))?;

    match user {
        Some(user) => Ok(Some(user)),
        None => Err(warp::reject::custom(AppError::Unauthorized)),
    }
}

/// The caller, or `None` when no `Authorization` header was sent
///
/// A header carrying an unknown or malformed token is rejected rather than
/// treated as anonymous.
pub fn optional_user(
    store: Arc<dyn WordStore>,
) -> impl Filter<Extract = (Option<User>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let store = store.clone();
        async move { resolve_user(store, header).await }
    })
}

/// The caller; rejects with 401 when unauthenticated
pub fn required_user(
    store: Arc<dyn WordStore>,
) -> impl Filter<Extract = (User,), Error = Rejection> + Clone {
    optional_user(store).and_then(|user: Option<User>| async move {
        user.ok_or_else(|| warp::reject::custom(AppError::Unauthorized))
    })
}
