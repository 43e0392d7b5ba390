use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod handlers;
pub mod repo;
mod views;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/entries", get(handlers::index))
        .route("/entries/new", get(handlers::new_page).post(handlers::create))
        .route("/entries/:title", get(handlers::detail))
        .route("/entries/:title/edit", get(handlers::edit_page).post(handlers::edit))
        .route("/entries/:title/delete", post(handlers::delete))
}
