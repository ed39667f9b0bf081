//! Server-Sent Events for live dashboard refresh.
//!
//! The dashboard subscribes once and re-fetches whichever panel an event
//! invalidates. Events carry identifiers only, never full rows.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::{extractors::StaffUser, middleware::AppState};

/// Change event types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChangeEvent {
    /// A report was created.
    ReportCreated { id: i32 },
    /// A report was updated (including status changes).
    ReportUpdated { id: i32 },
    /// A report was deleted.
    ReportDeleted { id: i32 },
    /// Categories or facility types changed.
    TaxonomyChanged,
    /// Connection established.
    Connected,
}

/// Broadcast channel for dashboard change events.
#[derive(Clone)]
pub struct ChangeBroadcaster {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeBroadcaster {
    /// Create a new broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self { sender }
    }

    /// Broadcast an event to all connected dashboards.
    pub fn broadcast(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to the change stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Number of connected subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Dashboard change SSE stream.
async fn change_stream(
    StaffUser(_user): StaffUser,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|event| {
            Ok(Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    let initial = stream::once(async {
        Ok(Event::default()
            .json_data(&ChangeEvent::Connected)
            .unwrap_or_else(|_| Event::default().data("connected")))
    });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// Create the events router.
pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", get(change_stream))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcaster_new() {
        let broadcaster = ChangeBroadcaster::new();
        assert_eq!(broadcaster.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscriber() {
        let broadcaster = ChangeBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast(ChangeEvent::ReportCreated { id: 7 });

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, ChangeEvent::ReportCreated { id: 7 }));
    }

    #[test]
    fn test_event_serialization() {
        let event = ChangeEvent::ReportUpdated { id: 3 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"reportUpdated\""));
        assert!(json.contains("\"id\":3"));
    }
}
