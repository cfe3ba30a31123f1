//! Model info handler

use axum::{extract::State, Json};

use crate::model::ArtifactInfo;
use crate::{AppError, AppResult, AppState};

/// Describe the loaded artifacts and the feature layout
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ArtifactInfo>> {
    let artifacts = state.artifacts.as_deref().ok_or(AppError::ModelNotLoaded)?;
    Ok(Json(artifacts.info()))
}
