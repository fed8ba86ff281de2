use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::RecommendationResult,
    routes::AppState,
};

/// Handler for the learner recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(learner_id): Path<Uuid>,
) -> AppResult<Json<RecommendationResult>> {
    tracing::info!(
        request_id = %request_id,
        learner_id = %learner_id,
        "Processing recommendation request"
    );

    let result = state.recommender.recommend(learner_id).await;

    tracing::info!(
        request_id = %request_id,
        is_enrolled_in_all_courses = result.is_enrolled_in_all_courses,
        "Recommendation completed"
    );

    Ok(Json(result))
}
