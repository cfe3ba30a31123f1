//! Landing page handler

use axum::{extract::State, response::Html};

use crate::{AppError, AppResult, AppState};

/// Serve `index.html` from the template directory
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let path = state.config.template_dir.join("index.html");

    let page = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| AppError::InternalError(format!("failed to read {}: {}", path.display(), e)))?;

    Ok(Html(page))
}
