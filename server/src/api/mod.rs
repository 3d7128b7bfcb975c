mod data_uri;
mod error;
mod identify;

use std::sync::Arc;

use axum::{
    handler::Handler,
    routing::{post, MethodRouter},
    Router,
};

pub use error::ApiError;

use crate::AppState;

/// Build the API router
pub fn router() -> Router<Arc<AppState>> {
    let image = post_only(identify::identify_image);
    let live = post_only(identify::identify_live);
    let rgb = post_only(identify::identify_rgb);

    Router::new()
        .route("/identify-image", image.clone())
        .route("/identify-image/", image)
        .route("/identify-live", live.clone())
        .route("/identify-live/", live)
        .route("/identify-rgb", rgb.clone())
        .route("/identify-rgb/", rgb)
}

/// POST route answering every other method with a JSON 405
fn post_only<H, T>(handler: H) -> MethodRouter<Arc<AppState>>
where
    H: Handler<T, Arc<AppState>>,
    T: 'static,
{
    post(handler).fallback(identify::method_not_allowed)
}
