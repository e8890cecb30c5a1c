// GET /health handler

use crate::models::HealthResponse;
use std::convert::Infallible;

pub async fn health_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&HealthResponse { status: "ok" }))
}
