pub mod issues;

use std::sync::Arc;

use axum::middleware;
use axum::Extension;
use axum::Router;
use common::http::print_request_response;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::PlatformProvider;

pub fn attach_routes(mut router: Router, platform: &Arc<PlatformProvider>) -> Router {
    router = issues::attach_routes(router);

    router = router.layer(Extension(platform.issues.clone()));

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(print_request_response))
}
