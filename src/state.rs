use crate::{
    config::{RuntimeConfiguration, StoreKind},
    routes::sse::SseEvent,
    store::{RecordStore, in_memory::InMemoryStore, json_file::JsonFileStore},
};
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;
use tokio::sync::{
    Mutex, MutexGuard,
    broadcast::{Receiver, Sender, channel},
};

#[derive(Clone, Debug)]
pub struct RosterState {
    store: Arc<dyn RecordStore>,
    mutation_lock: Arc<Mutex<()>>,
    sse_events_sender: Sender<SseEvent>,
}

impl RosterState {
    pub fn new(config: &RuntimeConfiguration) -> Self {
        let store: Arc<dyn RecordStore> = match config.store_kind() {
            StoreKind::File(path) => {
                info!(?path, "Using JSON file store");
                Arc::new(JsonFileStore::new(path.clone()))
            }
            StoreKind::Memory => {
                warn!("Using in-memory store, nothing will survive a restart");
                Arc::new(InMemoryStore::new())
            }
        };

        Self::from_store(store)
    }

    pub fn from_store(store: Arc<dyn RecordStore>) -> Self {
        let (tx, _rx) = channel(16);

        Self {
            store,
            mutation_lock: Arc::new(Mutex::new(())),
            sse_events_sender: tx,
        }
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-sse@2.2.3" integrity="sha384-Y4gc0CK6Kg+hmulDc6rZPJu0tqvk7EWlih0Oh+2OkAi1ZDlCbBDCQEE2uVk472Ky" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Student Roster" }
                }
                body hx-ext="sse" sse-connect="/sse_feed" class="bg-gray-900 min-h-screen flex flex-col items-center text-white p-8" {
                    nav class="w-full max-w-6xl flex flex-row space-x-4 mb-8" {
                        a href="/" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" { "Roster" }
                        a href="/import_export" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" { "Import / Export" }
                    }
                    (markup)
                }
            }
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Held for the whole read-modify-write of a mutation so concurrent writers can't lose
    /// each other's updates.
    pub async fn lock_for_mutation(&self) -> MutexGuard<'_, ()> {
        self.mutation_lock.lock().await
    }

    pub fn subscribe_to_sse_feed(&self) -> Receiver<SseEvent> {
        self.sse_events_sender.subscribe()
    }

    pub fn send_sse_event(&self, event: SseEvent) {
        let _ = self.sse_events_sender.send(event);
    }
}
