use axum::{routing::get, Router};
use tracing::{debug, info, warn};

use crate::state::AppState;

pub mod handlers;
pub mod password;
pub mod repo;
pub mod session;
mod views;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout).post(handlers::logout))
}

/// Create the configured development user at startup, if any.
pub async fn seed_user(state: &AppState) {
    let Some(seed) = state.config.seed_user.clone() else {
        return;
    };
    match repo::User::find_by_email(&state.db, &seed.email).await {
        Ok(Some(_)) => debug!(email = %seed.email, "seed user already exists"),
        Ok(None) => match password::hash_password(&seed.password) {
            Ok(hash) => {
                match repo::User::create(&state.db, &seed.username, &seed.email, &hash).await {
                    Ok(user) => info!(user_id = %user.id, email = %user.email, "seed user created"),
                    Err(e) => warn!(error = %e, "seed user creation failed"),
                }
            }
            Err(e) => warn!(error = %e, "seed user creation failed"),
        },
        Err(e) => warn!(error = %e, "seed user lookup failed"),
    }
}
