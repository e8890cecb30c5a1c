// POST /accounts/register handler

use super::reject;
use crate::models::RegisterResponse;
use crate::service::{Registration, VocabularyService};
use warp::http::StatusCode;

pub async fn register_handler(
    service: VocabularyService,
    registration: Registration,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = service.register(registration).await.map_err(reject)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&RegisterResponse::from(user)),
        StatusCode::CREATED,
    ))
}
