// Route definitions

use std::convert::Infallible;

use serde::de::DeserializeOwned;
use warp::Filter;

use crate::auth::{optional_user, required_user};
use crate::error::handle_rejection;
use crate::handlers;
use crate::service::{RequestOrigin, VocabularyService};

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 16 * 1024;

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// `Host` and `X-Forwarded-Proto` of the request
fn request_origin() -> impl Filter<Extract = (RequestOrigin,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("host")
        .and(warp::header::optional::<String>("x-forwarded-proto"))
        .map(RequestOrigin::new)
}

pub fn configure_routes(
    service: VocabularyService,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let store = service.store().clone();
    let with_service = warp::any().map(move || service.clone());

    // GET /
    let home = warp::path::end()
        .and(warp::get())
        .and_then(handlers::home_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    // POST /lookup
    let lookup = warp::path("lookup")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_service.clone())
        .and(optional_user(store.clone()))
        .and(json_body())
        .and_then(handlers::lookup_handler);

    // POST /save
    let save_word = warp::path("save")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_service.clone())
        .and(required_user(store.clone()))
        .and(json_body())
        .and_then(handlers::save_word_handler);

    // GET /my-words
    let my_words = warp::path("my-words")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_service.clone())
        .and(required_user(store.clone()))
        .and_then(handlers::my_words_handler);

    // GET /quiz
    let quiz = warp::path("quiz")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_service.clone())
        .and(required_user(store.clone()))
        .and_then(handlers::quiz_handler);

    // POST /quiz/submit
    let submit_answer = warp::path("quiz")
        .and(warp::path("submit"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_service.clone())
        .and(required_user(store.clone()))
        .and(request_origin())
        .and(json_body())
        .and_then(handlers::submit_answer_handler);

    // POST /remove
    let remove_word = warp::path("remove")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_service.clone())
        .and(required_user(store))
        .and(json_body())
        .and_then(handlers::remove_word_handler);

    // POST /accounts/register
    let register = warp::path("accounts")
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_service)
        .and(json_body())
        .and_then(handlers::register_handler);

    // Combine routes
    home.or(health)
        .or(lookup)
        .or(save_word)
        .or(my_words)
        .or(quiz)
        .or(submit_answer)
        .or(remove_word)
        .or(register)
        .recover(handle_rejection)
}
