//! Upload session
//!
//! Drives `Idle -> Uploading -> Uploaded | Failed` for the single active
//! upload. Every start issues a new [`UploadTicket`]; a completion carrying an
//! older ticket belongs to a superseded selection and is dropped.
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::UploadError;
use crate::models::{AssetId, AssetKind, Resolution, UploadRequest};
use crate::size_guard::SizePolicy;
use crate::storage::AssetStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading {
        file_name: String,
        size_bytes: u64,
    },
    Uploaded(AssetId),
    Failed(UploadError),
}

impl UploadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Uploading { .. } => "uploading",
            UploadState::Uploaded(_) => "uploaded",
            UploadState::Failed(_) => "failed",
        }
    }
}

/// Correlates an upload result with the start that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

pub struct UploadSession {
    policy: SizePolicy,
    state: UploadState,
    generation: u64,
    in_flight: Option<UploadTicket>,
    /// Kind of the most recently started upload
    kind: AssetKind,
    state_tx: watch::Sender<UploadState>,
}

impl UploadSession {
    pub fn new(policy: SizePolicy) -> Self {
        let (state_tx, _) = watch::channel(UploadState::Idle);
        Self {
            policy,
            state: UploadState::Idle,
            generation: 0,
            in_flight: None,
            kind: AssetKind::Image,
            state_tx,
        }
    }

    /// Stream of state changes
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn policy(&self) -> &SizePolicy {
        &self.policy
    }

    pub fn asset_id(&self) -> Option<&AssetId> {
        match self.state {
            UploadState::Uploaded(ref id) => Some(id),
            _ => None,
        }
    }

    /// Kind of the uploaded asset, once there is one
    pub fn asset_kind(&self) -> Option<AssetKind> {
        self.asset_id().map(|_| self.kind)
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, UploadState::Uploading { .. })
    }

    /// Start a new upload and supersede any in-flight one.
    ///
    /// Validation runs here, before any network call: a missing file or one
    /// over the size limit fails the session immediately and no ticket is
    /// issued. On success the session is `Uploading` and the caller performs
    /// the upload, then reports back through [`UploadSession::complete`].
    pub fn begin(&mut self, request: Option<&UploadRequest>) -> Result<UploadTicket, UploadError> {
        self.generation += 1;
        self.in_flight = None;

        let Some(request) = request else {
            self.transition(UploadState::Failed(UploadError::NoFile));
            return Err(UploadError::NoFile);
        };

        if let Err(rejected) = self.policy.check(request.kind, &request.file) {
            warn!(
                kind = %request.kind,
                file_name = %request.file.name,
                actual = rejected.actual,
                max = rejected.max,
                "Upload rejected by size guard"
            );
            let err = UploadError::from(rejected);
            self.transition(UploadState::Failed(err.clone()));
            return Err(err);
        }

        let ticket = UploadTicket(self.generation);
        self.in_flight = Some(ticket);
        self.kind = request.kind;
        self.transition(UploadState::Uploading {
            file_name: request.file.name.clone(),
            size_bytes: request.file.size_bytes(),
        });
        Ok(ticket)
    }

    /// Apply an upload result if `ticket` is still the current one
    pub fn complete(
        &mut self,
        ticket: UploadTicket,
        result: Result<AssetId, UploadError>,
    ) -> Resolution {
        if self.in_flight != Some(ticket) {
            debug!(ticket = ticket.0, "Ignoring result of superseded upload");
            return Resolution::StaleIgnored;
        }
        self.in_flight = None;

        match result {
            Ok(asset_id) => {
                info!(asset_id = %asset_id, "Upload session completed");
                self.transition(UploadState::Uploaded(asset_id));
            }
            Err(err) => {
                warn!("Upload session failed: {err}");
                self.transition(UploadState::Failed(err));
            }
        }
        Resolution::Applied
    }

    /// Begin, upload through `store`, and complete in one call
    pub async fn upload_with(
        &mut self,
        store: &dyn AssetStore,
        request: Option<&UploadRequest>,
    ) -> &UploadState {
        let Ok(ticket) = self.begin(request) else {
            return &self.state;
        };
        // begin only issues a ticket when a request is present
        if let Some(request) = request {
            let result = store.upload(request).await;
            let _ = self.complete(ticket, result);
        }
        &self.state
    }

    fn transition(&mut self, next: UploadState) {
        debug!(from = self.state.as_str(), to = next.as_str(), "Upload state transition");
        self.state = next.clone();
        self.state_tx.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaFile;
    use crate::storage::MockAssetStore;

    fn asset(id: &str) -> AssetId {
        AssetId::new(id).unwrap()
    }

    fn image(len: usize) -> UploadRequest {
        UploadRequest::image(MediaFile::new("photo.png", vec![0u8; len]))
    }

    #[test]
    fn test_begin_moves_to_uploading() {
        let mut session = UploadSession::new(SizePolicy::default());
        assert_eq!(session.state(), &UploadState::Idle);

        let ticket = session.begin(Some(&image(10)));
        assert!(ticket.is_ok());
        assert_eq!(
            session.state(),
            &UploadState::Uploading {
                file_name: "photo.png".into(),
                size_bytes: 10
            }
        );
        assert!(session.is_uploading());
    }

    #[test]
    fn test_no_file_fails() {
        let mut session = UploadSession::new(SizePolicy::default());
        assert_eq!(session.begin(None), Err(UploadError::NoFile));
        assert_eq!(session.state(), &UploadState::Failed(UploadError::NoFile));
    }

    #[test]
    fn test_oversized_video_fails_without_ticket() {
        let policy = SizePolicy {
            image_max_bytes: None,
            video_max_bytes: Some(8),
        };
        let mut session = UploadSession::new(policy);
        let request = UploadRequest::video(MediaFile::new("clip.mp4", vec![0u8; 9]), "t", "d");

        let err = session.begin(Some(&request)).unwrap_err();
        assert_eq!(err, UploadError::TooLarge { actual: 9, max: 8 });
        assert_eq!(session.state(), &UploadState::Failed(err));
    }

    #[test]
    fn test_complete_success_and_failure() {
        let mut session = UploadSession::new(SizePolicy::default());
        let ticket = session.begin(Some(&image(1))).unwrap();
        assert!(session.complete(ticket, Ok(asset("a1"))).is_applied());
        assert_eq!(session.asset_id(), Some(&asset("a1")));

        let ticket = session.begin(Some(&image(1))).unwrap();
        let failure = UploadError::Upload("status 500".into());
        assert!(session.complete(ticket, Err(failure.clone())).is_applied());
        assert_eq!(session.state(), &UploadState::Failed(failure));
        assert_eq!(session.asset_id(), None);
    }

    #[test]
    fn test_late_result_of_replaced_session_is_ignored() {
        let mut session = UploadSession::new(SizePolicy::default());
        let first = session.begin(Some(&image(1))).unwrap();
        let second = session.begin(Some(&image(2))).unwrap();
        assert_ne!(first, second);

        assert!(session.complete(second, Ok(asset("newer"))).is_applied());
        assert_eq!(
            session.complete(first, Ok(asset("older"))),
            Resolution::StaleIgnored
        );
        assert_eq!(session.asset_id(), Some(&asset("newer")));
    }

    #[test]
    fn test_rejected_start_still_supersedes_in_flight_upload() {
        let mut session = UploadSession::new(SizePolicy::default());
        let first = session.begin(Some(&image(1))).unwrap();
        let _ = session.begin(None);

        assert_eq!(
            session.complete(first, Ok(asset("late"))),
            Resolution::StaleIgnored
        );
        assert_eq!(session.state(), &UploadState::Failed(UploadError::NoFile));
    }

    #[test]
    fn test_ticket_completes_once() {
        let mut session = UploadSession::new(SizePolicy::default());
        let ticket = session.begin(Some(&image(1))).unwrap();
        assert!(session.complete(ticket, Ok(asset("a"))).is_applied());
        assert_eq!(
            session.complete(ticket, Ok(asset("b"))),
            Resolution::StaleIgnored
        );
        assert_eq!(session.asset_id(), Some(&asset("a")));
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let mut session = UploadSession::new(SizePolicy::default());
        let mut rx = session.subscribe();
        assert_eq!(*rx.borrow(), UploadState::Idle);

        let ticket = session.begin(Some(&image(3))).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_str(), "uploading");

        let _ = session.complete(ticket, Ok(asset("x")));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), UploadState::Uploaded(asset("x")));
    }

    #[tokio::test]
    async fn test_upload_with_skips_network_for_oversized_video() {
        let mut store = MockAssetStore::new();
        store.expect_upload().times(0);

        let mut session = UploadSession::new(SizePolicy::default());
        let big = vec![0u8; 70 * 1024 * 1024 + 1];
        let request = UploadRequest::video(MediaFile::new("big.mp4", big), "t", "d");

        let state = session.upload_with(&store, Some(&request)).await;
        assert_eq!(
            state,
            &UploadState::Failed(UploadError::TooLarge {
                actual: 70 * 1024 * 1024 + 1,
                max: 70 * 1024 * 1024,
            })
        );
    }

    #[tokio::test]
    async fn test_upload_with_calls_store_once() {
        let mut store = MockAssetStore::new();
        store
            .expect_upload()
            .times(1)
            .returning(|_| Ok(AssetId::new("img123").unwrap()));

        let mut session = UploadSession::new(SizePolicy::default());
        let state = session.upload_with(&store, Some(&image(2 * 1024 * 1024))).await;
        assert_eq!(state, &UploadState::Uploaded(asset("img123")));
    }

    #[tokio::test]
    async fn test_upload_with_surfaces_transport_error() {
        let mut store = MockAssetStore::new();
        store
            .expect_upload()
            .times(1)
            .returning(|_| Err(UploadError::Upload("connection refused".into())));

        let mut session = UploadSession::new(SizePolicy::default());
        let state = session.upload_with(&store, Some(&image(5))).await;
        assert_eq!(
            state,
            &UploadState::Failed(UploadError::Upload("connection refused".into()))
        );
    }
}
