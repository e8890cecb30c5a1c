// POST /save handler

use super::reject;
use crate::models::WordIdRequest;
use crate::service::VocabularyService;
use crate::store::User;

pub async fn save_word_handler(
    service: VocabularyService,
    user: User,
    request: WordIdRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let outcome = service
        .save_word(&user, request.word_id)
        .await
        .map_err(reject)?;

    Ok(warp::reply::json(&outcome))
}
