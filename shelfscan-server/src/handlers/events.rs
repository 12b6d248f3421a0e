//! Server-Sent Events handler for profile updates

use crate::state::{AppState, ServerEvent};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Event name and JSON payload sent for a server event
pub fn event_payload(event: &ServerEvent) -> (&'static str, String) {
    match event {
        ServerEvent::BooksUpdated { user_id, count } => (
            "books_updated",
            serde_json::json!({ "user_id": user_id, "count": count }).to_string(),
        ),
        ServerEvent::ProfileDeleted { user_id } => (
            "profile_deleted",
            serde_json::json!({ "user_id": user_id }).to_string(),
        ),
        ServerEvent::Error { message } => (
            "error",
            serde_json::json!({ "message": message }).to_string(),
        ),
    }
}

/// SSE endpoint for profile updates
pub async fn profile_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.subscribe());

    let event_stream = stream.filter_map(|result| match result {
        Ok(event) => {
            let (event_type, data) = event_payload(&event);
            Some(Ok(Event::default().event(event_type).data(data)))
        }
        // Lagged receivers skip what they missed
        Err(_) => None,
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
