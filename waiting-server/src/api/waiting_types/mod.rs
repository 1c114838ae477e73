//! 排队类型 API

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/venues/{venue_id}/waiting-types", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/reorder", put(handler::reorder))
        .route("/{id}", put(handler::update).delete(handler::delete))
}
