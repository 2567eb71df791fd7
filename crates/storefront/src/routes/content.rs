//! Content document handlers.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::services::content::ContentDocument;
use crate::state::AppState;

async fn serve(state: &AppState, doc: ContentDocument) -> Result<Json<serde_json::Value>> {
    Ok(Json(doc.load(&state.config().content_dir).await?))
}

/// `GET /content/menu`
pub async fn menu(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    serve(&state, ContentDocument::Menu).await
}

/// `GET /content/footer`
pub async fn footer(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    serve(&state, ContentDocument::Footer).await
}
