// POST /lookup handler

use super::reject;
use crate::models::LookupRequest;
use crate::service::VocabularyService;
use crate::store::User;

pub async fn lookup_handler(
    service: VocabularyService,
    user: Option<User>,
    request: LookupRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let view = service
        .lookup(user.as_ref(), &request.word)
        .await
        .map_err(reject)?;

    Ok(warp::reply::json(&view))
}
