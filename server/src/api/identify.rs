use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::{FormRejection, JsonRejection},
        State,
    },
    Form, Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use super::{data_uri, ApiError};
use crate::{
    color::{DominantColor, RgbMatch},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct ColorsResponse {
    pub colors: Vec<DominantColor>,
}

#[derive(Debug, Deserialize)]
pub struct LiveFrame {
    /// Canvas snapshot as a `data:image/...;base64,` URI
    image: Option<String>,
}

/// Channels may be JSON integers, floats (truncated) or numeric strings
#[derive(Debug, Deserialize)]
pub struct RgbRequest {
    #[serde(deserialize_with = "deserialize_channel")]
    r: i64,
    #[serde(deserialize_with = "deserialize_channel")]
    g: i64,
    #[serde(deserialize_with = "deserialize_channel")]
    b: i64,
}

fn deserialize_channel<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let channel = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    channel.ok_or_else(|| serde::de::Error::custom(format!("Invalid channel value: {}", value)))
}

/// POST /api/identify-image/ - Dominant colors of an uploaded image file
pub async fn identify_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ColorsResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let mut image = None;
    let mut n_colors = state.config.upload_colors;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                image = Some(field.bytes().await.map_err(|e| ApiError::BadRequest(e.body_text()))?);
            }
            Some("n_colors") => {
                let text = field.text().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
                n_colors = text
                    .trim()
                    .parse()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid n_colors value: {}", text)))?;
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("No image file provided in the request".into()))?;
    let colors = extract_colors(state, image, n_colors).await?;
    Ok(Json(ColorsResponse { colors }))
}

/// POST /api/identify-live/ - Dominant color of a single camera frame
pub async fn identify_live(
    State(state): State<Arc<AppState>>,
    frame: Result<Form<LiveFrame>, FormRejection>,
) -> Result<Json<ColorsResponse>, ApiError> {
    let Form(frame) = frame.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let uri = frame
        .image
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No image data in the request body".into()))?;

    let bytes = data_uri::decode(&uri).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let n_colors = state.config.live_colors;
    let colors = extract_colors(state, Bytes::from(bytes), n_colors).await?;
    Ok(Json(ColorsResponse { colors }))
}

/// POST /api/identify-rgb/ - Name of a single RGB value
pub async fn identify_rgb(
    State(state): State<Arc<AppState>>,
    request: Result<Json<RgbRequest>, JsonRejection>,
) -> Result<Json<RgbMatch>, ApiError> {
    let Json(request) = request.map_err(|e| {
        tracing::debug!("Rejected RGB payload: {}", e.body_text());
        ApiError::BadRequest(r#"Invalid JSON data. Expecting {"r":, "g":, "b":}"#.into())
    })?;

    let result = state.identifier.identify_rgb(request.r, request.g, request.b)?;
    Ok(Json(result))
}

/// Any non-POST request to an identification endpoint
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Decoding and clustering are CPU bound, run them off the async workers
async fn extract_colors(
    state: Arc<AppState>,
    image: Bytes,
    n_colors: usize,
) -> Result<Vec<DominantColor>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("identify_image", %request_id, n_colors, bytes = image.len());

    let blocking_span = span.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _guard = blocking_span.enter();
        state.identifier.identify_image(&image, n_colors)
    })
    .instrument(span)
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(result?)
}
