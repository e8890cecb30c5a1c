// GET /my-words handler

use super::reject;
use crate::models::MyWordsResponse;
use crate::service::VocabularyService;
use crate::store::User;

pub async fn my_words_handler(
    service: VocabularyService,
    user: User,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user_words = service.my_words(&user).await.map_err(reject)?;

    Ok(warp::reply::json(&MyWordsResponse { user_words }))
}
