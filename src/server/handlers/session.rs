use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::session::SessionSnapshot;
use crate::state::AppState;

/// Current session snapshot, for clients that render without the socket.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot().await)
}
