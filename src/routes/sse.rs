use crate::state::RosterState;
use axum::{
    extract::State,
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
};
use futures::Stream;
use std::convert::Infallible;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SseEvent {
    CrudStudent,
}

impl SseEvent {
    pub const fn name(self) -> &'static str {
        match self {
            Self::CrudStudent => "crud_student",
        }
    }
}

pub async fn sse_feed(
    State(state): State<RosterState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // lagged receivers just skip ahead, the next refresh reloads everything anyway
    let stream = BroadcastStream::new(state.subscribe_to_sse_feed()).filter_map(|event| {
        event
            .ok()
            .map(|event| Ok(Event::default().event(event.name()).data(event.name())))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::in_memory::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn subscribers_see_sent_events() {
        let state = RosterState::from_store(Arc::new(InMemoryStore::new()));
        let mut rx = state.subscribe_to_sse_feed();

        state.send_sse_event(SseEvent::CrudStudent);

        assert_eq!(rx.recv().await.unwrap(), SseEvent::CrudStudent);
        assert_eq!(SseEvent::CrudStudent.name(), "crud_student");
    }
}
