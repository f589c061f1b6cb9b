//! KioskController - the serial event loop around the session state machine.
//!
//! Every input (user events, gateway completions, idle expiry) is handled one
//! at a time on this loop. Slow calls run on spawned tasks that report back
//! through the same queue.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use mirage_core::camera::{Camera, Facing};
use mirage_core::credential::CredentialSelector;
use mirage_core::export::ImageExporter;
use mirage_core::gallery::{GalleryItem, GalleryRepository, UsageCounter};
use mirage_core::generation::GenerationGateway;
use mirage_core::image::EncodedImage;
use mirage_core::publish::PublishGateway;
use mirage_core::session::{Mode, RequestTicket, Session, SessionEvent};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::effect::Effect;
use super::machine::SessionStateMachine;
use crate::capture::CaptureGuard;
use crate::idle::IdleMonitor;

/// Collaborators the controller drives.
#[derive(Clone)]
pub struct KioskServices {
    pub generation: Arc<dyn GenerationGateway>,
    pub publish: Arc<dyn PublishGateway>,
    pub gallery: Arc<dyn GalleryRepository>,
    pub usage: Arc<dyn UsageCounter>,
    pub exporter: Arc<dyn ImageExporter>,
    pub credentials: Arc<dyn CredentialSelector>,
    pub camera: Arc<dyn Camera>,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub idle_timeout: Duration,
    pub default_facing: Facing,
}

/// What renderers see after each event.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session: Session,
    pub usage_count: u64,
    /// Gallery listing, refreshed on entering the gallery and after changes.
    pub gallery: Arc<Vec<GalleryItem>>,
    pub facing: Facing,
    pub camera_live: bool,
    pub idle_deadline: Option<Instant>,
}

/// Cloneable handle for raising events and observing the session.
#[derive(Clone)]
pub struct KioskHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
    shutdown: CancellationToken,
}

impl KioskHandle {
    /// Queues an event. Returns `false` once the controller is gone.
    pub fn send(&self, event: SessionEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

pub struct KioskController {
    machine: SessionStateMachine,
    services: KioskServices,
    idle: IdleMonitor,
    facing: Facing,
    capture: Option<CaptureGuard>,
    /// Set when opening the camera failed; cleared on leaving capture or flipping.
    camera_failed: bool,
    generation_task: Option<(RequestTicket, JoinHandle<()>)>,
    usage_count: u64,
    gallery: Arc<Vec<GalleryItem>>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
    shutdown: CancellationToken,
}

impl KioskController {
    pub fn new(services: KioskServices, settings: ControllerSettings) -> (Self, KioskHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let machine = SessionStateMachine::new();
        let initial = SessionSnapshot {
            session: machine.session().clone(),
            usage_count: 0,
            gallery: Arc::new(Vec::new()),
            facing: settings.default_facing,
            camera_live: false,
            idle_deadline: None,
        };
        let (snapshots, snapshots_rx) = watch::channel(initial);
        let shutdown = CancellationToken::new();

        let handle = KioskHandle {
            events: events_tx.clone(),
            snapshots: snapshots_rx,
            shutdown: shutdown.clone(),
        };

        let controller = Self {
            machine,
            services,
            idle: IdleMonitor::new(settings.idle_timeout),
            facing: settings.default_facing,
            capture: None,
            camera_failed: false,
            generation_task: None,
            usage_count: 0,
            gallery: Arc::new(Vec::new()),
            events_tx,
            events_rx,
            snapshots,
            shutdown,
        };
        (controller, handle)
    }

    pub fn session(&self) -> &Session {
        self.machine.session()
    }

    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle.deadline()
    }

    pub fn camera_live(&self) -> bool {
        self.capture.is_some()
    }

    /// Loads the usage count for display and publishes the first snapshot.
    pub async fn start(&mut self) {
        match self.services.usage.get().await {
            Ok(count) => self.usage_count = count,
            Err(e) => tracing::error!(error = %e, "Failed to read usage counter"),
        }
        self.publish_snapshot();
    }

    /// Runs until shutdown is requested.
    pub async fn run(mut self) {
        self.start().await;
        tracing::info!(idle_timeout = ?self.idle.timeout(), "Kiosk controller running");

        while self.process_next().await {}

        self.abort_generation();
        self.capture = None;
        tracing::info!("Kiosk controller stopped");
    }

    /// Waits for the next event, timer expiry or shutdown and handles it.
    ///
    /// Returns `false` when the loop should stop.
    pub async fn process_next(&mut self) -> bool {
        let event = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return false,
            event = self.events_rx.recv() => match event {
                Some(event) => event,
                None => return false,
            },
            _ = self.idle.expired() => SessionEvent::IdleTimeout,
        };
        self.dispatch(event).await;
        true
    }

    /// Handles one event plus any follow-up events its effects produce.
    pub async fn dispatch(&mut self, event: SessionEvent) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            self.handle_one(event, &mut pending).await;
        }
        self.publish_snapshot();
    }

    async fn handle_one(&mut self, event: SessionEvent, pending: &mut VecDeque<SessionEvent>) {
        let before = self.machine.mode();
        let user_input = event.is_user_input();
        tracing::debug!(event = event.name(), mode = %before, "Handling event");

        if before == Mode::Capture {
            self.handle_camera_input(&event, pending).await;
        }
        if let SessionEvent::GenerationFinished { ticket, .. } = &event {
            if self.generation_task.as_ref().is_some_and(|(running, _)| running == ticket) {
                self.generation_task = None;
            }
        }

        let effects = self.machine.handle(event);
        for effect in effects {
            self.run_effect(effect, pending).await;
        }

        let after = self.machine.mode();
        self.idle.observe(after, user_input, before != after);
        self.sync_camera(pending).await;

        if after == Mode::Gallery && before != Mode::Gallery {
            self.refresh_gallery().await;
        }
    }

    async fn handle_camera_input(&mut self, event: &SessionEvent, pending: &mut VecDeque<SessionEvent>) {
        match event {
            SessionEvent::Shutter => {
                let Some(guard) = self.capture.as_mut() else {
                    pending.push_back(SessionEvent::CameraUnavailable(
                        "Camera is not ready".to_string(),
                    ));
                    return;
                };
                match guard.snapshot().await {
                    Ok(image) => pending.push_back(SessionEvent::PhotoCaptured(image)),
                    Err(e) => pending.push_back(SessionEvent::CameraUnavailable(e.to_string())),
                }
            }
            SessionEvent::FlipCamera => {
                self.facing = self.facing.toggled();
                // Release before asking for the other camera.
                if let Some(guard) = self.capture.take() {
                    guard.release();
                }
                self.camera_failed = false;
                tracing::info!(facing = %self.facing, "Switching camera");
            }
            _ => {}
        }
    }

    /// Holds a stream exactly while in capture mode.
    async fn sync_camera(&mut self, pending: &mut VecDeque<SessionEvent>) {
        if self.machine.mode() != Mode::Capture {
            if let Some(guard) = self.capture.take() {
                guard.release();
                tracing::debug!("Camera released");
            }
            self.camera_failed = false;
            return;
        }
        if self.capture.is_some() || self.camera_failed {
            return;
        }

        match CaptureGuard::acquire(self.services.camera.as_ref(), self.facing).await {
            Ok(guard) => {
                tracing::debug!(facing = %self.facing, "Camera acquired");
                self.capture = Some(guard);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to open camera");
                self.camera_failed = true;
                pending.push_back(SessionEvent::CameraUnavailable(e.to_string()));
            }
        }
    }

    async fn run_effect(&mut self, effect: Effect, pending: &mut VecDeque<SessionEvent>) {
        tracing::debug!(effect = effect.name(), "Running effect");
        match effect {
            Effect::Generate {
                ticket,
                image,
                prompt,
            } => self.spawn_generation(ticket, image, prompt),

            Effect::CancelGeneration { ticket } => match self.generation_task.take() {
                Some((running, task)) if running == ticket => {
                    task.abort();
                    tracing::info!(%ticket, "Generation aborted");
                }
                other => self.generation_task = other,
            },

            Effect::RecordGeneration {
                image,
                style_name,
                prompt,
            } => self.record_generation(image, &style_name, &prompt).await,

            Effect::Publish { ticket, image } => {
                let gateway = Arc::clone(&self.services.publish);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = gateway.publish(&image).await;
                    let _ = tx.send(SessionEvent::PublishFinished { ticket, outcome });
                });
            }

            Effect::ExportImage {
                ticket,
                image,
                file_stem,
            } => {
                let outcome = self
                    .services
                    .exporter
                    .export(&image, &file_stem)
                    .await
                    .map_err(|e| e.to_string());
                pending.push_back(SessionEvent::LocalSaveFinished { ticket, outcome });
            }

            Effect::SelectCredentials => {
                let selector = Arc::clone(&self.services.credentials);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = selector.select_credentials().await;
                    let _ = tx.send(SessionEvent::CredentialSelectionFinished(outcome));
                });
            }

            Effect::DeleteGalleryItem { id } => {
                let outcome = match self.services.gallery.delete(&id).await {
                    Ok(()) => Ok("Portrait deleted".to_string()),
                    Err(e) => Err(format!("Could not delete portrait: {e}")),
                };
                self.refresh_gallery().await;
                pending.push_back(SessionEvent::GalleryActionFinished(outcome));
            }

            Effect::ExportGalleryItem { id } => {
                let outcome = export_gallery_item(&self.services, &id).await;
                pending.push_back(SessionEvent::GalleryActionFinished(outcome));
            }
        }
    }

    fn spawn_generation(&mut self, ticket: RequestTicket, image: EncodedImage, prompt: String) {
        self.abort_generation();

        let gateway = Arc::clone(&self.services.generation);
        let tx = self.events_tx.clone();
        let task = tokio::spawn(async move {
            let outcome = gateway.generate(&image, &prompt).await;
            let _ = tx.send(SessionEvent::GenerationFinished { ticket, outcome });
        });
        self.generation_task = Some((ticket, task));
    }

    fn abort_generation(&mut self) {
        if let Some((_, task)) = self.generation_task.take() {
            task.abort();
        }
    }

    /// Counter first, then the gallery write; neither failure reaches the user.
    async fn record_generation(&mut self, image: EncodedImage, style_name: &str, prompt: &str) {
        match self.services.usage.increment_and_get().await {
            Ok(count) => self.usage_count = count,
            Err(e) => tracing::error!(error = %e, "Failed to increment usage counter"),
        }

        match self.services.gallery.put(image, style_name, prompt).await {
            Ok(item) => tracing::info!(id = %item.id, style = style_name, "Portrait saved to gallery"),
            Err(e) => tracing::error!(error = %e, "Failed to save portrait to gallery"),
        }
    }

    async fn refresh_gallery(&mut self) {
        match self.services.gallery.list().await {
            Ok(items) => self.gallery = Arc::new(items),
            Err(e) => tracing::error!(error = %e, "Failed to list gallery"),
        }
    }

    fn publish_snapshot(&self) {
        self.snapshots.send_replace(SessionSnapshot {
            session: self.machine.session().clone(),
            usage_count: self.usage_count,
            gallery: Arc::clone(&self.gallery),
            facing: self.facing,
            camera_live: self.capture.is_some(),
            idle_deadline: self.idle.deadline(),
        });
    }
}

async fn export_gallery_item(services: &KioskServices, id: &str) -> Result<String, String> {
    let item = services
        .gallery
        .find_by_id(id)
        .await
        .map_err(|e| format!("Could not read portrait: {e}"))?
        .ok_or_else(|| format!("Portrait {id} no longer exists"))?;

    services
        .exporter
        .export(&item.image, &item.export_stem())
        .await
        .map(|path| format!("Saved to {}", path.display()))
        .map_err(|e| format!("Could not save portrait: {e}"))
}
