// POST /remove handler

use super::reject;
use crate::models::{SuccessResponse, WordIdRequest};
use crate::service::VocabularyService;
use crate::store::User;

pub async fn remove_word_handler(
    service: VocabularyService,
    user: User,
    request: WordIdRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    service
        .remove_word(&user, request.word_id)
        .await
        .map_err(reject)?;

    Ok(warp::reply::json(&SuccessResponse { success: true }))
}
