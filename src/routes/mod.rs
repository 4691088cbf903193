pub mod analytics;
pub mod auth;
pub mod businesses;
pub mod health;
pub mod pages;
pub mod payment;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub use validation::ValidatedJson;

/// Build the application router with every API route attached
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/api/businesses", post(businesses::create_business))
        .route(
            "/api/businesses/:id",
            get(businesses::get_business)
                .put(businesses::update_business)
                .delete(businesses::delete_business),
        )
        .route("/api/pages", post(pages::create_page))
        .route("/api/pages/:id", get(pages::get_page).put(pages::update_page))
        .route(
            "/api/pages/business/:business_id",
            get(pages::get_page_by_business),
        )
        .route("/api/analytics/:page_id", get(analytics::get_analytics))
        .route("/api/analytics/:page_id/view", post(analytics::record_view))
        .route("/api/auth/magic-link", post(auth::request_magic_link))
        .route("/api/auth/verify", post(auth::verify_token))
        .route("/api/payment/initialize", post(payment::initialize_payment))
        .route("/api/payment/verify/:reference", get(payment::verify_payment))
        .route("/api/payment/webhook", post(payment::payment_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
