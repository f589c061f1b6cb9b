//! The session state machine.
//!
//! `handle` is a pure transition function: it mutates the owned [`Session`]
//! and returns the effects the controller must run. Gateway completions come
//! back as events carrying the [`RequestTicket`] they were issued with, and a
//! completion whose ticket is no longer current is dropped.

use mirage_core::prompt::build_prompt;
use mirage_core::session::{Mode, PublishStatus, PublishView, RequestTicket, Session, SessionEvent};
use mirage_core::style::catalog;

use super::effect::Effect;

#[derive(Debug)]
pub struct SessionStateMachine {
    session: Session,
    next_ticket: RequestTicket,
    /// Single-flight latch: set on entering `Generating`, cleared when that
    /// request completes or is cancelled.
    generation_in_flight: Option<RequestTicket>,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateMachine {
    /// A machine on the attract screen with an empty session.
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    /// Starts from an arbitrary session, e.g. to resume a restored state.
    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            next_ticket: RequestTicket::new(1),
            generation_in_flight: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    pub fn generation_in_flight(&self) -> Option<RequestTicket> {
        self.generation_in_flight
    }

    /// Applies one event and returns the effects it requires.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mode = self.session.mode;
        let name = event.name();

        match event {
            SessionEvent::ActivityDetected => {}

            SessionEvent::IdleTimeout => {
                if mode.suspends_idle_timer() {
                    self.ignore(name);
                } else {
                    tracing::info!(%mode, "Idle timeout, returning to attract screen");
                    self.reset_to(Mode::Idle, &mut effects);
                }
            }

            SessionEvent::Start if mode == Mode::Idle => {
                self.enter_into(Mode::Welcome, &mut effects);
            }

            SessionEvent::CategoryChosen(category) if mode == Mode::Welcome => {
                self.session.category = Some(category);
                self.enter_into(Mode::StyleSelection, &mut effects);
            }

            SessionEvent::StyleChosen { style_id, attribute } if mode == Mode::StyleSelection => {
                let style = self
                    .session
                    .category
                    .and_then(|category| catalog::find(category, &style_id));
                match style {
                    Some(style) => {
                        self.session.style = Some(style.clone());
                        if let Some(attribute) = attribute {
                            self.session.subject_attribute = attribute;
                        }
                        self.session.last_error = None;
                        self.enter_into(Mode::Capture, &mut effects);
                    }
                    None => {
                        tracing::warn!(
                            style_id = %style_id,
                            category = ?self.session.category,
                            "Unknown style chosen, ignoring"
                        );
                    }
                }
            }

            SessionEvent::SetSubjectAttribute(attribute)
                if matches!(mode, Mode::StyleSelection | Mode::Capture) =>
            {
                let applies = self
                    .session
                    .category
                    .is_some_and(|category| category.requires_subject_attribute());
                if applies {
                    self.session.subject_attribute = attribute;
                } else {
                    self.ignore(name);
                }
            }

            // Camera hardware is the controller's business.
            SessionEvent::Shutter | SessionEvent::FlipCamera if mode == Mode::Capture => {}

            SessionEvent::PhotoCaptured(image) if mode == Mode::Capture => {
                self.session.captured_image = Some(image);
                self.session.final_prompt = self.session.style.as_ref().map(|style| {
                    build_prompt(&style.id, self.session.subject_attribute, &style.template)
                });
                self.enter_into(Mode::Generating, &mut effects);
            }

            SessionEvent::CameraUnavailable(message) if mode == Mode::Capture => {
                tracing::warn!(%message, "Camera unavailable");
                self.session.last_error = Some(message);
            }

            SessionEvent::BackToStyles if mode == Mode::Capture => {
                self.session.last_error = None;
                self.enter_into(Mode::StyleSelection, &mut effects);
            }

            SessionEvent::GenerationFinished { ticket, outcome } => {
                if mode != Mode::Generating || self.generation_in_flight != Some(ticket) {
                    tracing::warn!(
                        %ticket,
                        current = ?self.generation_in_flight,
                        %mode,
                        "Discarding stale generation result"
                    );
                } else {
                    self.generation_in_flight = None;
                    match outcome {
                        Ok(image) => {
                            if let (Some(style_name), Some(prompt)) = (
                                self.session.style_name().map(str::to_string),
                                self.session.final_prompt.clone(),
                            ) {
                                effects.push(Effect::RecordGeneration {
                                    image: image.clone(),
                                    style_name,
                                    prompt,
                                });
                            }
                            self.session.generated_image = Some(image);
                            self.session.last_error = None;
                            self.enter_into(Mode::Result, &mut effects);
                        }
                        Err(error) if error.is_credential_failure() => {
                            tracing::warn!(error = %error, "Generation rejected credentials");
                            self.enter_into(Mode::CredentialSelection, &mut effects);
                        }
                        Err(error) => {
                            tracing::error!(error = %error, "Generation failed");
                            self.session.last_error = Some(error.message);
                            self.enter_into(Mode::Capture, &mut effects);
                        }
                    }
                }
            }

            SessionEvent::Retake if mode == Mode::Result => {
                self.session.captured_image = None;
                self.session.generated_image = None;
                self.session.last_error = None;
                self.enter_into(Mode::Capture, &mut effects);
            }

            SessionEvent::ChooseAnotherStyle if mode == Mode::Result => {
                self.session.generated_image = None;
                self.enter_into(Mode::StyleSelection, &mut effects);
            }

            SessionEvent::RequestShareLink if mode == Mode::Result => {
                self.enter_into(Mode::Publish, &mut effects);
            }

            SessionEvent::PublishFinished { ticket, outcome } => {
                match self.current_publish(mode, ticket) {
                    Some(view) if view.is_uploading() => {
                        view.status = match outcome {
                            Ok(url) => PublishStatus::Ready { url },
                            Err(error) => PublishStatus::Failed(error),
                        };
                    }
                    _ => {
                        tracing::warn!(%ticket, %mode, "Discarding stale publish result");
                    }
                }
            }

            SessionEvent::SaveLocally if mode == Mode::Publish => {
                let request = self.session.publish.as_ref().map(|view| view.ticket).zip(
                    self.session.generated_image.clone(),
                );
                match request {
                    Some((ticket, image)) => {
                        let file_stem = match &self.session.style {
                            Some(style) => format!("mirage-{}", style.id),
                            None => "mirage-portrait".to_string(),
                        };
                        effects.push(Effect::ExportImage {
                            ticket,
                            image,
                            file_stem,
                        });
                    }
                    None => self.ignore(name),
                }
            }

            SessionEvent::LocalSaveFinished { ticket, outcome } => {
                match self.current_publish(mode, ticket) {
                    Some(view) => match outcome {
                        Ok(path) => {
                            view.saved_to = Some(path);
                            view.save_error = None;
                        }
                        Err(message) => {
                            tracing::error!(%message, "Local save failed");
                            view.save_error = Some(message);
                        }
                    },
                    None => {
                        tracing::warn!(%ticket, %mode, "Discarding stale local save result");
                    }
                }
            }

            SessionEvent::ReturnFromPublish if mode == Mode::Publish => {
                self.session.publish = None;
                self.enter_into(Mode::Result, &mut effects);
            }

            SessionEvent::Back if mode == Mode::StyleSelection => {
                self.reset_to(Mode::Welcome, &mut effects);
            }

            SessionEvent::StartOver => {
                self.reset_to(Mode::Welcome, &mut effects);
            }

            SessionEvent::OpenGallery if mode == Mode::Welcome => {
                self.enter_into(Mode::Gallery, &mut effects);
            }

            SessionEvent::CloseGallery if mode == Mode::Gallery => {
                self.reset_to(Mode::Welcome, &mut effects);
            }

            SessionEvent::DeleteGalleryItem(id) if mode == Mode::Gallery => {
                effects.push(Effect::DeleteGalleryItem { id });
            }

            SessionEvent::ExportGalleryItem(id) if mode == Mode::Gallery => {
                effects.push(Effect::ExportGalleryItem { id });
            }

            SessionEvent::GalleryActionFinished(outcome) if mode == Mode::Gallery => {
                self.session.notice = Some(match outcome {
                    Ok(message) => message,
                    Err(message) => {
                        tracing::error!(%message, "Gallery action failed");
                        message
                    }
                });
            }

            SessionEvent::SelectCredentials if mode == Mode::CredentialSelection => {
                effects.push(Effect::SelectCredentials);
            }

            SessionEvent::CredentialSelectionFinished(outcome)
                if mode == Mode::CredentialSelection =>
            {
                match outcome {
                    // The abandoned flow is not resumed; the participant starts fresh.
                    Ok(()) => self.reset_to(Mode::Welcome, &mut effects),
                    Err(error) => {
                        tracing::error!(error = %error, "Credential selection failed");
                        self.session.notice = Some(error.to_string());
                    }
                }
            }

            _ => self.ignore(name),
        }

        effects
    }

    /// Requests a mode change through the precondition guard.
    ///
    /// Entering `Generating` without a captured image and style, or `Result`
    /// and `Publish` without a generated image and style, starts over instead.
    pub fn enter(&mut self, target: Mode) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.enter_into(target, &mut effects);
        effects
    }

    fn enter_into(&mut self, target: Mode, effects: &mut Vec<Effect>) {
        if target == Mode::Generating {
            if let Some(ticket) = self.generation_in_flight {
                tracing::warn!(%ticket, "Generation already in flight, not issuing another");
                return;
            }
        }

        let satisfied = match target {
            Mode::Generating => {
                self.session.can_generate() && self.session.final_prompt.is_some()
            }
            Mode::Result | Mode::Publish => self.session.can_show_result(),
            _ => true,
        };
        if !satisfied {
            tracing::warn!(
                from = %self.session.mode,
                to = %target,
                "Missing data for mode, starting over"
            );
            self.reset_to(Mode::Welcome, effects);
            return;
        }

        self.cancel_generation_if_leaving(target, effects);
        self.set_mode(target);

        match target {
            Mode::Generating => {
                let ticket = self.issue_ticket();
                self.generation_in_flight = Some(ticket);
                if let (Some(image), Some(prompt)) = (
                    self.session.captured_image.clone(),
                    self.session.final_prompt.clone(),
                ) {
                    effects.push(Effect::Generate {
                        ticket,
                        image,
                        prompt,
                    });
                }
            }
            Mode::Publish => {
                let ticket = self.issue_ticket();
                self.session.publish = Some(PublishView::uploading(ticket));
                if let Some(image) = self.session.generated_image.clone() {
                    effects.push(Effect::Publish { ticket, image });
                }
            }
            _ => {}
        }
    }

    /// Clears every selection and artifact, then lands on `target`.
    fn reset_to(&mut self, target: Mode, effects: &mut Vec<Effect>) {
        self.cancel_generation_if_leaving(target, effects);
        self.session.clear();
        self.set_mode(target);
    }

    fn cancel_generation_if_leaving(&mut self, target: Mode, effects: &mut Vec<Effect>) {
        if target == Mode::Generating {
            return;
        }
        if let Some(ticket) = self.generation_in_flight.take() {
            tracing::info!(%ticket, "Cancelling in-flight generation");
            effects.push(Effect::CancelGeneration { ticket });
        }
    }

    fn set_mode(&mut self, target: Mode) {
        let from = self.session.mode;
        if from != target {
            self.session.notice = None;
            tracing::info!(%from, to = %target, "Mode transition");
        }
        self.session.mode = target;
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();
        ticket
    }

    fn current_publish(&mut self, mode: Mode, ticket: RequestTicket) -> Option<&mut PublishView> {
        if mode != Mode::Publish {
            return None;
        }
        self.session
            .publish
            .as_mut()
            .filter(|view| view.ticket == ticket)
    }

    fn ignore(&self, event: &str) {
        tracing::debug!(event, mode = %self.session.mode, "Ignoring event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::credential::CredentialError;
    use mirage_core::generation::ProviderError;
    use mirage_core::image::EncodedImage;
    use mirage_core::prompt::IDENTITY_PREAMBLE;
    use mirage_core::publish::PublishError;
    use mirage_core::style::{Category, SubjectAttribute};
    use std::path::PathBuf;

    fn photo() -> EncodedImage {
        EncodedImage::new("image/jpeg", b"selfie".to_vec())
    }

    fn portrait() -> EncodedImage {
        EncodedImage::new("image/png", b"portrait".to_vec())
    }

    fn machine_in_capture(category: Category, style_id: &str) -> SessionStateMachine {
        let mut machine = SessionStateMachine::new();
        machine.handle(SessionEvent::Start);
        machine.handle(SessionEvent::CategoryChosen(category));
        machine.handle(SessionEvent::StyleChosen {
            style_id: style_id.to_string(),
            attribute: None,
        });
        assert_eq!(machine.mode(), Mode::Capture);
        machine
    }

    fn generate_ticket(effects: &[Effect]) -> RequestTicket {
        match effects {
            [Effect::Generate { ticket, .. }] => *ticket,
            other => panic!("expected a single Generate effect, got {other:?}"),
        }
    }

    fn machine_in_generating() -> (SessionStateMachine, RequestTicket) {
        let mut machine = machine_in_capture(Category::Adult, "adult-royal");
        let effects = machine.handle(SessionEvent::PhotoCaptured(photo()));
        (machine, generate_ticket(&effects))
    }

    fn machine_in_result() -> SessionStateMachine {
        let (mut machine, ticket) = machine_in_generating();
        machine.handle(SessionEvent::GenerationFinished {
            ticket,
            outcome: Ok(portrait()),
        });
        assert_eq!(machine.mode(), Mode::Result);
        machine
    }

    #[test]
    fn test_happy_path_to_generation() {
        let mut machine = SessionStateMachine::new();
        assert_eq!(machine.mode(), Mode::Idle);

        machine.handle(SessionEvent::Start);
        assert_eq!(machine.mode(), Mode::Welcome);

        machine.handle(SessionEvent::CategoryChosen(Category::Adult));
        assert_eq!(machine.mode(), Mode::StyleSelection);

        machine.handle(SessionEvent::StyleChosen {
            style_id: "adult-bollywood".into(),
            attribute: Some(SubjectAttribute::Male),
        });
        assert_eq!(machine.mode(), Mode::Capture);
        assert_eq!(machine.session().subject_attribute, SubjectAttribute::Male);

        let effects = machine.handle(SessionEvent::PhotoCaptured(photo()));
        assert_eq!(machine.mode(), Mode::Generating);

        let expected_prompt = build_prompt("adult-bollywood", SubjectAttribute::Male, "");
        assert_eq!(machine.session().final_prompt.as_deref(), Some(expected_prompt.as_str()));
        match effects.as_slice() {
            [Effect::Generate { image, prompt, .. }] => {
                assert_eq!(image, &photo());
                assert_eq!(prompt, &expected_prompt);
                assert!(prompt.starts_with(IDENTITY_PREAMBLE));
            }
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn test_unknown_style_is_ignored() {
        let mut machine = SessionStateMachine::new();
        machine.handle(SessionEvent::Start);
        machine.handle(SessionEvent::CategoryChosen(Category::Child));

        let effects = machine.handle(SessionEvent::StyleChosen {
            style_id: "adult-royal".into(),
            attribute: None,
        });

        assert!(effects.is_empty());
        assert_eq!(machine.mode(), Mode::StyleSelection);
        assert!(machine.session().style.is_none());
    }

    #[test]
    fn test_subject_attribute_only_for_single_subjects() {
        let mut couple = machine_in_capture(Category::Couple, "couple-1");
        couple.handle(SessionEvent::SetSubjectAttribute(SubjectAttribute::Male));
        assert_eq!(couple.session().subject_attribute, SubjectAttribute::Female);

        let mut adult = machine_in_capture(Category::Adult, "adult-royal");
        adult.handle(SessionEvent::SetSubjectAttribute(SubjectAttribute::Male));
        assert_eq!(adult.session().subject_attribute, SubjectAttribute::Male);
    }

    #[test]
    fn test_generation_fires_once_per_entry() {
        let (mut machine, ticket) = machine_in_generating();
        assert_eq!(machine.generation_in_flight(), Some(ticket));

        // A second capture while generating is not accepted.
        let effects = machine.handle(SessionEvent::PhotoCaptured(photo()));
        assert!(effects.is_empty());

        // Nor can Generating be re-entered directly while the latch is set.
        let effects = machine.enter(Mode::Generating);
        assert!(effects.is_empty());
        assert_eq!(machine.mode(), Mode::Generating);
        assert_eq!(machine.generation_in_flight(), Some(ticket));
    }

    #[test]
    fn test_success_records_generation_and_shows_result() {
        let (mut machine, ticket) = machine_in_generating();
        let prompt = machine.session().final_prompt.clone().unwrap();

        let effects = machine.handle(SessionEvent::GenerationFinished {
            ticket,
            outcome: Ok(portrait()),
        });

        assert_eq!(machine.mode(), Mode::Result);
        assert_eq!(machine.session().generated_image, Some(portrait()));
        assert_eq!(machine.generation_in_flight(), None);
        assert_eq!(
            effects,
            vec![Effect::RecordGeneration {
                image: portrait(),
                style_name: "Royal Majesty".into(),
                prompt,
            }]
        );
    }

    #[test]
    fn test_credential_failure_routes_to_credential_selection() {
        let (mut machine, ticket) = machine_in_generating();

        let effects = machine.handle(SessionEvent::GenerationFinished {
            ticket,
            outcome: Err(ProviderError::new("429 Too Many Requests")),
        });

        assert!(effects.is_empty());
        assert_eq!(machine.mode(), Mode::CredentialSelection);
        assert!(machine.session().last_error.is_none());
        assert!(machine.session().captured_image.is_some());
        assert!(machine.session().style.is_some());
    }

    #[test]
    fn test_other_failure_routes_to_capture_with_message() {
        let (mut machine, ticket) = machine_in_generating();

        machine.handle(SessionEvent::GenerationFinished {
            ticket,
            outcome: Err(ProviderError::new("the model is feeling shy")),
        });

        assert_eq!(machine.mode(), Mode::Capture);
        assert_eq!(
            machine.session().last_error.as_deref(),
            Some("the model is feeling shy")
        );
    }

    #[test]
    fn test_stale_generation_result_is_discarded() {
        let (mut machine, ticket) = machine_in_generating();

        let effects = machine.handle(SessionEvent::GenerationFinished {
            ticket: ticket.next(),
            outcome: Ok(portrait()),
        });

        assert!(effects.is_empty());
        assert_eq!(machine.mode(), Mode::Generating);
        assert_eq!(machine.generation_in_flight(), Some(ticket));
    }

    #[test]
    fn test_start_over_while_generating_cancels_and_discards() {
        let (mut machine, ticket) = machine_in_generating();

        let effects = machine.handle(SessionEvent::StartOver);
        assert_eq!(effects, vec![Effect::CancelGeneration { ticket }]);
        assert_eq!(machine.mode(), Mode::Welcome);
        assert!(machine.session().is_cleared());
        assert_eq!(machine.generation_in_flight(), None);

        // The late completion changes nothing.
        let effects = machine.handle(SessionEvent::GenerationFinished {
            ticket,
            outcome: Ok(portrait()),
        });
        assert!(effects.is_empty());
        assert_eq!(machine.mode(), Mode::Welcome);
        assert!(machine.session().generated_image.is_none());
    }

    #[test]
    fn test_idle_timeout_ignored_while_busy() {
        let (mut machine, _) = machine_in_generating();
        machine.handle(SessionEvent::IdleTimeout);
        assert_eq!(machine.mode(), Mode::Generating);

        let mut capture = machine_in_capture(Category::Adult, "adult-royal");
        capture.handle(SessionEvent::IdleTimeout);
        assert_eq!(capture.mode(), Mode::Capture);
    }

    #[test]
    fn test_idle_timeout_clears_everything() {
        let mut machine = machine_in_result();
        machine.handle(SessionEvent::IdleTimeout);

        assert_eq!(machine.mode(), Mode::Idle);
        assert!(machine.session().is_cleared());
    }

    #[test]
    fn test_retake_and_choose_another_style() {
        let mut machine = machine_in_result();
        machine.handle(SessionEvent::Retake);
        assert_eq!(machine.mode(), Mode::Capture);
        assert!(machine.session().captured_image.is_none());
        assert!(machine.session().generated_image.is_none());
        assert!(machine.session().style.is_some());

        let mut machine = machine_in_result();
        machine.handle(SessionEvent::ChooseAnotherStyle);
        assert_eq!(machine.mode(), Mode::StyleSelection);
        assert!(machine.session().generated_image.is_none());
        assert!(machine.session().category.is_some());
    }

    #[test]
    fn test_back_to_styles_clears_error() {
        let (mut machine, ticket) = machine_in_generating();
        machine.handle(SessionEvent::GenerationFinished {
            ticket,
            outcome: Err(ProviderError::new("timeout")),
        });
        machine.handle(SessionEvent::BackToStyles);

        assert_eq!(machine.mode(), Mode::StyleSelection);
        assert!(machine.session().last_error.is_none());
        assert!(machine.session().style.is_some());
    }

    #[test]
    fn test_publish_flow() {
        let mut machine = machine_in_result();

        let effects = machine.handle(SessionEvent::RequestShareLink);
        assert_eq!(machine.mode(), Mode::Publish);
        let ticket = match effects.as_slice() {
            [Effect::Publish { ticket, image }] => {
                assert_eq!(image, &portrait());
                *ticket
            }
            other => panic!("unexpected effects {other:?}"),
        };
        assert!(machine.session().publish.as_ref().unwrap().is_uploading());

        machine.handle(SessionEvent::PublishFinished {
            ticket,
            outcome: Ok("https://i.ibb.co/x.png".into()),
        });
        assert_eq!(
            machine.session().publish.as_ref().unwrap().status,
            PublishStatus::Ready {
                url: "https://i.ibb.co/x.png".into()
            }
        );

        machine.handle(SessionEvent::ReturnFromPublish);
        assert_eq!(machine.mode(), Mode::Result);
        assert!(machine.session().publish.is_none());
    }

    #[test]
    fn test_publish_failure_keeps_manual_fallback() {
        let mut machine = machine_in_result();
        let effects = machine.handle(SessionEvent::RequestShareLink);
        let Some(Effect::Publish { ticket, .. }) = effects.first().cloned() else {
            panic!("expected publish effect");
        };

        machine.handle(SessionEvent::PublishFinished {
            ticket,
            outcome: Err(PublishError::configuration("key missing")),
        });
        assert_eq!(machine.mode(), Mode::Publish);

        let effects = machine.handle(SessionEvent::SaveLocally);
        assert_eq!(
            effects,
            vec![Effect::ExportImage {
                ticket,
                image: portrait(),
                file_stem: "mirage-adult-royal".into(),
            }]
        );

        machine.handle(SessionEvent::LocalSaveFinished {
            ticket,
            outcome: Ok(PathBuf::from("/tmp/mirage-adult-royal.png")),
        });
        let view = machine.session().publish.as_ref().unwrap();
        assert_eq!(view.saved_to, Some(PathBuf::from("/tmp/mirage-adult-royal.png")));
        assert!(matches!(view.status, PublishStatus::Failed(_)));
    }

    #[test]
    fn test_stale_publish_result_is_discarded() {
        let mut machine = machine_in_result();
        let effects = machine.handle(SessionEvent::RequestShareLink);
        let Some(Effect::Publish { ticket, .. }) = effects.first().cloned() else {
            panic!("expected publish effect");
        };
        machine.handle(SessionEvent::ReturnFromPublish);
        machine.handle(SessionEvent::RequestShareLink);

        machine.handle(SessionEvent::PublishFinished {
            ticket,
            outcome: Ok("https://old".into()),
        });
        assert!(machine.session().publish.as_ref().unwrap().is_uploading());
    }

    #[test]
    fn test_guard_redirects_to_cleared_welcome() {
        let mut machine = machine_in_capture(Category::Adult, "adult-royal");
        let effects = machine.enter(Mode::Result);
        assert!(effects.is_empty());
        assert_eq!(machine.mode(), Mode::Welcome);
        assert!(machine.session().is_cleared());

        let mut machine = SessionStateMachine::with_session(Session {
            mode: Mode::Capture,
            ..Session::default()
        });
        let effects = machine.handle(SessionEvent::PhotoCaptured(photo()));
        assert!(effects.is_empty());
        assert_eq!(machine.mode(), Mode::Welcome);
        assert!(machine.session().is_cleared());
    }

    #[test]
    fn test_gallery_actions() {
        let mut machine = SessionStateMachine::new();
        machine.handle(SessionEvent::Start);
        machine.handle(SessionEvent::OpenGallery);
        assert_eq!(machine.mode(), Mode::Gallery);

        let effects = machine.handle(SessionEvent::DeleteGalleryItem("abc".into()));
        assert_eq!(effects, vec![Effect::DeleteGalleryItem { id: "abc".into() }]);

        machine.handle(SessionEvent::GalleryActionFinished(Ok("Deleted".into())));
        assert_eq!(machine.session().notice.as_deref(), Some("Deleted"));

        machine.handle(SessionEvent::CloseGallery);
        assert_eq!(machine.mode(), Mode::Welcome);
        assert!(machine.session().notice.is_none());
    }

    #[test]
    fn test_credential_selection() {
        let (mut machine, ticket) = machine_in_generating();
        machine.handle(SessionEvent::GenerationFinished {
            ticket,
            outcome: Err(ProviderError::new("PERMISSION_DENIED")),
        });

        assert_eq!(
            machine.handle(SessionEvent::SelectCredentials),
            vec![Effect::SelectCredentials]
        );

        machine.handle(SessionEvent::CredentialSelectionFinished(Err(CredentialError(
            "dialog closed".into(),
        ))));
        assert_eq!(machine.mode(), Mode::CredentialSelection);
        assert!(machine.session().notice.is_some());

        machine.handle(SessionEvent::CredentialSelectionFinished(Ok(())));
        assert_eq!(machine.mode(), Mode::Welcome);
        assert!(machine.session().is_cleared());
    }

    #[test]
    fn test_events_in_wrong_mode_are_ignored() {
        let mut machine = SessionStateMachine::new();
        for event in [
            SessionEvent::Retake,
            SessionEvent::RequestShareLink,
            SessionEvent::CategoryChosen(Category::Adult),
            SessionEvent::Shutter,
            SessionEvent::CloseGallery,
            SessionEvent::SaveLocally,
        ] {
            assert!(machine.handle(event).is_empty());
            assert_eq!(machine.mode(), Mode::Idle);
        }
    }

    #[test]
    fn test_start_over_from_any_mode() {
        let mut machine = machine_in_result();
        machine.handle(SessionEvent::RequestShareLink);
        machine.handle(SessionEvent::StartOver);
        assert_eq!(machine.mode(), Mode::Welcome);
        assert!(machine.session().is_cleared());
    }
}
