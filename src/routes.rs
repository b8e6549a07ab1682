use axum::{Json, extract::State, http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;
use std::sync::Arc;

use crate::models::{SessionSnapshot, UserInput, TONE_PRESETS};
use crate::session::{run_generation_cycle, BrandEngine, SharedSession};

#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub engine: Arc<dyn BrandEngine>,
}

/// Submit the questionnaire and run one full generation cycle. The response
/// is the final session snapshot; a failed generation is still a 200 whose
/// snapshot carries the Error state and banner message. Only malformed input
/// (400) and a racing submission (409) are HTTP-level failures.
pub async fn submit_brand_input(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<Json<SessionSnapshot>, Response> {
    if let Err(msg) = input.validate() {
        return Err((StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response());
    }

    match run_generation_cycle(state.engine.as_ref(), &state.session, input).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => Err((
            StatusCode::CONFLICT,
            Json(json!({"error": e.to_string()})),
        )
            .into_response()),
    }
}

/// Read-only snapshot for polling clients rendering the form, spinners,
/// result panels or the error banner.
pub async fn get_session_state(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.read().snapshot())
}

/// The tone presets the questionnaire offers.
pub async fn get_tone_presets() -> Json<Vec<&'static str>> {
    Json(TONE_PRESETS.to_vec())
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
