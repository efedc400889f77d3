use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{get_availability, get_free_slots, AppState};
use crate::handlers::test::{health_check, test_free_slots};

pub fn create_router(app_state: Arc<AppState>, is_production: bool) -> Router {
    let mut router = Router::new();

    // Health check is always available
    let health_route = Router::new().route("/health", get(health_check));
    router = router.merge(health_route);

    // Availability endpoints are the product surface
    let api_routes = Router::new()
        .route("/api/calendar/availability", get(get_availability))
        .route("/api/calendar/free-slots", get(get_free_slots));
    router = router.merge(api_routes);

    // Only expose the sample endpoint outside production
    if !is_production {
        let test_routes = Router::new().route("/test/free-slots", get(test_free_slots));
        router = router.merge(test_routes);

        info!("Test routes enabled - server running in development mode");
    } else {
        info!("Running in production mode - only health and availability endpoints exposed");
    }

    router.with_state(app_state)
}
