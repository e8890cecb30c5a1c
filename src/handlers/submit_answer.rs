// POST /quiz/submit handler

use super::reject;
use crate::models::SubmitAnswerRequest;
use crate::service::{RequestOrigin, VocabularyService};
use crate::store::User;

pub async fn submit_answer_handler(
    service: VocabularyService,
    user: User,
    origin: RequestOrigin,
    request: SubmitAnswerRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let outcome = service
        .submit_answer(
            &user,
            request.user_word_id,
            &request.selected_answer,
            &request.correct_answer,
            &origin,
        )
        .await
        .map_err(reject)?;

    Ok(warp::reply::json(&outcome))
}
