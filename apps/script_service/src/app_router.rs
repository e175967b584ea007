use axum::{routing::get, Router};

use crate::{
    auth::auth_controller::auth_router, health::health_controller,
    script_generator::script_generator_controller::script_generator_router,
    scripts::scripts_controller::scripts_router,
};

pub fn application_router() -> Router {
    Router::new()
        .route("/v1/health", get(health_controller::health))
        .nest("/v1/auth", auth_router())
        .nest("/v1/scripts", scripts_router().merge(script_generator_router()))
}
