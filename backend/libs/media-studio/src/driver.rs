//! Async runtime for the studio dispatcher
//!
//! Executes the commands [`Studio::handle`] emits on a [`JoinSet`] and feeds
//! their outcomes back in as events. Uploads, render loads and exports may
//! overlap; correlation in the studio decides which results still count.
//! A task that dies without producing its event is reported back as the
//! failure of the operation it was running.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, error, warn};

use crate::error::{ExportError, StudioError, UploadError};
use crate::export::Exporter;
use crate::preview::RenderKey;
use crate::storage::{AssetStore, RenderFetcher};
use crate::studio::{Command, Event, Studio};
use crate::upload::{UploadState, UploadTicket};

/// What a spawned task is working on
#[derive(Debug)]
enum InFlight {
    Upload(UploadTicket),
    Render(RenderKey),
    Export,
}

impl InFlight {
    fn failed(self, err: &JoinError) -> Event {
        let reason = format!("task aborted: {err}");
        match self {
            InFlight::Upload(ticket) => Event::UploadFinished {
                ticket,
                result: Err(UploadError::Upload(reason)),
            },
            InFlight::Render(key) => Event::RenderFailed { key, reason },
            InFlight::Export => Event::ExportFinished(Err(ExportError::SaveFailed(reason))),
        }
    }
}

pub struct StudioDriver {
    studio: Studio,
    store: Arc<dyn AssetStore>,
    fetcher: Arc<dyn RenderFetcher>,
    exporter: Exporter,
    in_flight: JoinSet<Event>,
    tasks: HashMap<Id, InFlight>,
    notices: Vec<StudioError>,
}

impl StudioDriver {
    pub fn new(
        studio: Studio,
        store: Arc<dyn AssetStore>,
        fetcher: Arc<dyn RenderFetcher>,
        exporter: Exporter,
    ) -> Self {
        Self {
            studio,
            store,
            fetcher,
            exporter,
            in_flight: JoinSet::new(),
            tasks: HashMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn studio(&self) -> &Studio {
        &self.studio
    }

    pub fn subscribe_upload(&self) -> watch::Receiver<UploadState> {
        self.studio.upload().subscribe()
    }

    /// Errors surfaced to the user since the last drain
    pub fn drain_notices(&mut self) -> Vec<StudioError> {
        std::mem::take(&mut self.notices)
    }

    pub fn has_pending_work(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Handle one event and start whatever work it calls for
    pub fn dispatch(&mut self, event: Event) {
        for command in self.studio.handle(event) {
            self.spawn(command);
        }
    }

    /// Wait for the next finished task and dispatch its event.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn step(&mut self) -> bool {
        match self.in_flight.join_next_with_id().await {
            Some(joined) => {
                self.finish(joined);
                true
            }
            None => false,
        }
    }

    /// Run until no work is in flight
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Process events from `events` until the sender is dropped and all work
    /// has finished, then hand back the final studio state
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) -> Studio {
        let mut open = true;
        loop {
            tokio::select! {
                maybe_event = events.recv(), if open => match maybe_event {
                    Some(event) => self.dispatch(event),
                    None => open = false,
                },
                Some(joined) = self.in_flight.join_next_with_id(), if self.has_pending_work() => {
                    self.finish(joined)
                }
                else => break,
            }
        }
        debug!("Studio driver stopped");
        self.studio
    }

    fn finish(&mut self, joined: Result<(Id, Event), JoinError>) {
        match joined {
            Ok((id, event)) => {
                self.tasks.remove(&id);
                self.dispatch(event);
            }
            Err(e) => {
                error!("Studio task failed: {e}");
                if let Some(work) = self.tasks.remove(&e.id()) {
                    self.dispatch(work.failed(&e));
                }
            }
        }
    }

    fn spawn(&mut self, command: Command) {
        match command {
            Command::Upload { ticket, request } => {
                let store = Arc::clone(&self.store);
                let handle = self.in_flight.spawn(async move {
                    let result = store.upload(&request).await;
                    Event::UploadFinished { ticket, result }
                });
                self.tasks.insert(handle.id(), InFlight::Upload(ticket));
            }
            Command::LoadRender(request) => {
                let fetcher = Arc::clone(&self.fetcher);
                let key = request.key();
                let tracked = key.clone();
                let handle = self.in_flight.spawn(async move {
                    match fetcher.fetch(&request.url).await {
                        Ok(_) => Event::RenderLoaded(key),
                        Err(e) => Event::RenderFailed {
                            key,
                            reason: e.to_string(),
                        },
                    }
                });
                self.tasks.insert(handle.id(), InFlight::Render(tracked));
            }
            Command::Export { url, preset_name } => {
                let exporter = self.exporter.clone();
                let handle = self.in_flight.spawn(async move {
                    Event::ExportFinished(exporter.export(&url, preset_name).await)
                });
                self.tasks.insert(handle.id(), InFlight::Export);
            }
            Command::Notify(err) => {
                warn!(category = ?err.category(), "{err}");
                self.notices.push(err);
            }
        }
    }
}
