// GET /quiz handler

use super::reject;
use crate::models::QuizResponse;
use crate::service::VocabularyService;
use crate::store::User;

pub async fn quiz_handler(
    service: VocabularyService,
    user: User,
) -> Result<impl warp::Reply, warp::Rejection> {
    let state = service.next_quiz(&user).await.map_err(reject)?;

    Ok(warp::reply::json(&QuizResponse::from(state)))
}
