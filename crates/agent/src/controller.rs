//! Dialogue Controller
//!
//! Stage state machine. For every inbound event it reads the user's
//! conversation state, applies exactly one transition, stores the result and
//! emits at least one reply. Transitions are total: lookup misses and
//! delivery failures degrade to informational replies, never to errors.
//!
//! | Stage | Event | Next |
//! |---|---|---|
//! | any | greeting / interview / contact hr / unknown | unchanged |
//! | any | list jobs | `Listing` |
//! | any | apply for job `id` | `AwaitingResume(id)` |
//! | `AwaitingResume(id)` | accepted upload | `Done(id)` |
//! | `AwaitingResume(id)` | rejected upload | unchanged |
//! | other | upload | unchanged |

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hr_assistant_config::{render, RelayMode, ReplyTemplates, Settings};
use hr_assistant_core::{
    ConversationState, ConversationStore, DataLookup, DeliveryError, DeliveryGateway,
    DocumentRef, FallbackResponder, InboundEvent, JobId, LookupError, OutboundAction,
    RelayDestination,
};

use crate::intent::{ClassifyError, Intent, IntentClassifier};
use crate::locks::KeyedLocks;

/// Controller behavior switches
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Reject resumes that are not `.pdf`
    pub require_pdf: bool,
    /// Bound on every lookup, relay and send
    pub collaborator_timeout: Duration,
    pub relay_mode: RelayMode,
    /// Contact address and relay fallback recipient
    pub hr_contact_email: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ControllerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            require_pdf: settings.conversation.require_pdf,
            collaborator_timeout: settings.conversation.collaborator_timeout(),
            relay_mode: settings.relay.mode,
            hr_contact_email: settings.conversation.hr_contact_email.clone(),
        }
    }
}

/// Outcome of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub previous: ConversationState,
    pub state: ConversationState,
    /// Classified intent for text messages
    pub intent: Option<Intent>,
    pub actions: Vec<OutboundAction>,
}

impl Turn {
    /// Reply texts in emission order
    pub fn replies(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.text()).collect()
    }
}

pub struct DialogueController {
    classifier: IntentClassifier,
    store: Arc<dyn ConversationStore>,
    lookup: Arc<dyn DataLookup>,
    gateway: Arc<dyn DeliveryGateway>,
    fallback: Option<Arc<dyn FallbackResponder>>,
    templates: ReplyTemplates,
    config: ControllerConfig,
    locks: KeyedLocks,
}

impl DialogueController {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        lookup: Arc<dyn DataLookup>,
        gateway: Arc<dyn DeliveryGateway>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            classifier: IntentClassifier::default(),
            store,
            lookup,
            gateway,
            fallback: None,
            templates: ReplyTemplates::default(),
            config,
            locks: KeyedLocks::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_templates(mut self, templates: ReplyTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackResponder>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    /// Apply the transition for `event` without sending replies
    pub async fn handle(&self, event: &InboundEvent) -> Turn {
        let _guard = self.locks.lock(event.user_id()).await;
        self.process(event).await
    }

    /// Apply the transition and send its replies, in order, while still
    /// holding the user's lock
    pub async fn handle_and_dispatch(&self, event: &InboundEvent) -> Turn {
        let _guard = self.locks.lock(event.user_id()).await;
        let turn = self.process(event).await;
        self.dispatch(&turn.actions).await;
        turn
    }

    /// Send actions through the gateway; returns how many failed
    pub async fn dispatch(&self, actions: &[OutboundAction]) -> usize {
        let mut failures = 0;
        for action in actions {
            match action {
                OutboundAction::SendText { chat_id, text } => {
                    let sent = self
                        .within(self.gateway.send_text(chat_id, text), DeliveryError::Timeout)
                        .await;
                    if let Err(e) = sent {
                        failures += 1;
                        metrics::counter!(
                            "hr_assistant_delivery_failures_total",
                            "operation" => "send_text"
                        )
                        .increment(1);
                        tracing::warn!(chat_id = %chat_id, error = %e, "Failed to send reply");
                    }
                }
            }
        }
        failures
    }

    /// Release per-user locks nobody is waiting on
    pub fn prune_locks(&self) -> usize {
        self.locks.prune()
    }

    async fn process(&self, event: &InboundEvent) -> Turn {
        let user_id = event.user_id();
        let chat_id = event.chat_id();
        metrics::counter!("hr_assistant_events_total", "kind" => event.kind()).increment(1);

        let previous = match self.store.get(user_id).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Conversation store read failed, starting idle");
                ConversationState::Idle
            }
        };

        let (intent, state, replies) = match event {
            InboundEvent::TextMessage { text, .. } => {
                let classified = self.classifier.classify(text);
                let intent = classified.as_ref().ok().copied();
                let (state, replies) = self.on_text(user_id, previous, classified, text).await;
                (intent, state, replies)
            }
            InboundEvent::DocumentUpload {
                file_id, file_name, ..
            } => {
                let document = DocumentRef {
                    file_id: file_id.clone(),
                    file_name: file_name.clone(),
                    user_id: user_id.to_string(),
                };
                let (state, replies) = self.on_document(previous, &document).await;
                (None, state, replies)
            }
        };

        // Always written so TTL retention measures idleness from the last event
        if let Err(e) = self.store.put(user_id, state).await {
            tracing::warn!(user_id, error = %e, "Conversation store write failed");
        }

        if let Some(intent) = intent {
            metrics::counter!("hr_assistant_intents_total", "intent" => intent.label())
                .increment(1);
        }
        tracing::info!(
            user_id,
            event = event.kind(),
            intent = intent.map(|i| i.label()).unwrap_or("-"),
            from = %previous.stage(),
            to = %state.stage(),
            "Handled event"
        );

        let actions = replies
            .into_iter()
            .filter(|text| !text.trim().is_empty())
            .map(|text| OutboundAction::send_text(chat_id, text))
            .collect::<Vec<_>>();
        let actions = if actions.is_empty() {
            vec![OutboundAction::send_text(chat_id, self.templates.help.clone())]
        } else {
            actions
        };

        Turn {
            previous,
            state,
            intent,
            actions,
        }
    }

    async fn on_text(
        &self,
        user_id: &str,
        state: ConversationState,
        classified: Result<Intent, ClassifyError>,
        text: &str,
    ) -> (ConversationState, Vec<String>) {
        let intent = match classified {
            Ok(intent) => intent,
            Err(e) => {
                tracing::debug!(user_id, error = %e, "Application message without job id");
                return (state, vec![self.templates.invalid_job_id.clone()]);
            }
        };

        match intent {
            Intent::Greeting => (state, vec![self.templates.welcome.clone()]),
            Intent::ListJobs => (ConversationState::Listing, vec![self.render_jobs().await]),
            Intent::ApplyForJob(job_id) => (
                ConversationState::AwaitingResume(job_id),
                vec![render(
                    &self.templates.apply_prompt,
                    &[("job_id", &job_id.to_string())],
                )],
            ),
            Intent::AskInterview => {
                let reply = match state.job_id() {
                    Some(job_id) => self.render_interview(job_id).await,
                    None => self.templates.apply_first.clone(),
                };
                (state, vec![reply])
            }
            Intent::ContactHr => {
                let email = self.contact_email(state.job_id()).await;
                (
                    state,
                    vec![render(&self.templates.contact_hr, &[("email", &email)])],
                )
            }
            Intent::Unknown => (state, vec![self.fallback_reply(user_id, text).await]),
        }
    }

    async fn on_document(
        &self,
        state: ConversationState,
        document: &DocumentRef,
    ) -> (ConversationState, Vec<String>) {
        let ConversationState::AwaitingResume(job_id) = state else {
            return (state, vec![self.templates.upload_unexpected.clone()]);
        };

        if self.config.require_pdf
            && document.extension().as_deref()
                != Some(hr_assistant_config::constants::conversation::RESUME_EXTENSION)
        {
            let extension = document.extension().unwrap_or_else(|| "none".to_string());
            return (
                state,
                vec![render(
                    &self.templates.resume_rejected,
                    &[("extension", &extension)],
                )],
            );
        }

        let (destination, label) = self.relay_destination(job_id, document).await;
        let relayed = self
            .within(
                self.gateway.relay_document(document, &destination),
                DeliveryError::Timeout,
            )
            .await;
        let next = ConversationState::Done(job_id);

        match relayed {
            Ok(()) => {
                metrics::counter!("hr_assistant_relays_total").increment(1);
                let confirmation = render(
                    &self.templates.resume_received,
                    &[("job_id", &job_id.to_string()), ("destination", &label)],
                );
                (next, vec![confirmation, self.render_interview(job_id).await])
            }
            Err(e) => {
                metrics::counter!(
                    "hr_assistant_delivery_failures_total",
                    "operation" => "relay_document"
                )
                .increment(1);
                tracing::warn!(
                    user_id = %document.user_id,
                    job_id = %job_id,
                    error = %e,
                    "Resume relay failed"
                );
                (next, vec![self.templates.delivery_failed.clone()])
            }
        }
    }

    async fn render_jobs(&self) -> String {
        match self
            .within(self.lookup.list_open_jobs(), LookupError::Timeout)
            .await
        {
            Ok(jobs) if jobs.is_empty() => self.templates.no_openings.clone(),
            Ok(jobs) => {
                let mut lines = vec![self.templates.jobs_header.clone()];
                lines.extend(jobs.iter().map(|job| {
                    render(
                        &self.templates.job_line,
                        &[
                            ("job_id", &job.job_id.to_string()),
                            ("title", &job.title),
                            ("department", &job.department),
                            ("location", &job.location),
                            ("openings", &job.openings.to_string()),
                            ("contact_email", &job.contact_email),
                        ],
                    )
                }));
                lines.join("\n")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Job listing lookup failed");
                self.templates.lookup_unavailable.clone()
            }
        }
    }

    async fn render_interview(&self, job_id: JobId) -> String {
        let id = job_id.to_string();
        match self
            .within(self.lookup.interview_for(job_id), LookupError::Timeout)
            .await
        {
            Ok(Some(slot)) => render(
                &self.templates.interview_details,
                &[
                    ("job_id", &id),
                    ("title", &slot.title),
                    ("date", &slot.date),
                    ("time", &slot.time),
                    ("location", &slot.location),
                    ("interviewer", &slot.interviewer),
                ],
            ),
            Ok(None) => render(&self.templates.interview_not_scheduled, &[("job_id", &id)]),
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Interview lookup failed");
                self.templates.lookup_unavailable.clone()
            }
        }
    }

    /// Contact email of the tracked job, else the HR address
    async fn contact_email(&self, job_id: Option<JobId>) -> String {
        let Some(job_id) = job_id else {
            return self.config.hr_contact_email.clone();
        };
        match self.within(self.lookup.job(job_id), LookupError::Timeout).await {
            Ok(Some(job)) if !job.contact_email.trim().is_empty() => job.contact_email,
            Ok(_) => self.config.hr_contact_email.clone(),
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Job lookup failed");
                self.config.hr_contact_email.clone()
            }
        }
    }

    /// Destination for a resume plus a user-facing label for it
    async fn relay_destination(
        &self,
        job_id: JobId,
        document: &DocumentRef,
    ) -> (RelayDestination, String) {
        match self.config.relay_mode {
            RelayMode::Email => {
                let to = self.contact_email(Some(job_id)).await;
                let subject = format!(
                    "Resume for job {} from user {}",
                    job_id, document.user_id
                );
                (RelayDestination::Email { to: to.clone(), subject }, to)
            }
            RelayMode::ObjectStore => {
                let file_name = document.file_name.replace(['/', '\\'], "_");
                let key = format!(
                    "{}/{}/{}-{}",
                    hr_assistant_config::constants::conversation::RESUME_KEY_PREFIX,
                    job_id,
                    document.user_id,
                    file_name
                );
                (
                    RelayDestination::ObjectStore { key },
                    "our recruitment team".to_string(),
                )
            }
        }
    }

    async fn fallback_reply(&self, user_id: &str, text: &str) -> String {
        if let Some(fallback) = &self.fallback {
            match tokio::time::timeout(
                self.config.collaborator_timeout,
                fallback.respond(user_id, text),
            )
            .await
            {
                Ok(Some(reply)) => return reply,
                Ok(None) => {}
                Err(_) => tracing::warn!(user_id, "Fallback responder timed out"),
            }
        }
        self.templates.help.clone()
    }

    /// Run a collaborator call under the configured timeout
    async fn within<T, E, F>(&self, call: F, on_timeout: impl FnOnce(u64) -> E) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let limit = self.config.collaborator_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(limit.as_millis() as u64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryConversationStore;
    use async_trait::async_trait;
    use hr_assistant_core::{EmployeeRecord, InterviewSlot, JobListing, Stage};
    use parking_lot::Mutex;

    struct Jobs {
        jobs: Vec<JobListing>,
        interviews: Vec<InterviewSlot>,
    }

    #[async_trait]
    impl DataLookup for Jobs {
        async fn list_open_jobs(&self) -> Result<Vec<JobListing>, LookupError> {
            Ok(self.jobs.clone())
        }

        async fn interview_for(&self, job_id: JobId) -> Result<Option<InterviewSlot>, LookupError> {
            Ok(self.interviews.iter().find(|s| s.job_id == job_id).cloned())
        }

        async fn lookup_employee(&self, _: &str) -> Result<Option<EmployeeRecord>, LookupError> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct Recorder {
        relays: Mutex<Vec<RelayDestination>>,
    }

    #[async_trait]
    impl DeliveryGateway for Recorder {
        async fn send_text(&self, _: &str, _: &str) -> Result<(), DeliveryError> {
            Ok(())
        }

        async fn relay_document(
            &self,
            _: &DocumentRef,
            destination: &RelayDestination,
        ) -> Result<(), DeliveryError> {
            self.relays.lock().push(destination.clone());
            Ok(())
        }
    }

    fn controller(mode: RelayMode) -> (DialogueController, Arc<Recorder>) {
        controller_with(ControllerConfig {
            relay_mode: mode,
            ..ControllerConfig::default()
        })
    }

    fn controller_with(config: ControllerConfig) -> (DialogueController, Arc<Recorder>) {
        let lookup = Jobs {
            jobs: vec![JobListing {
                job_id: JobId::new(101),
                title: "Accountant".to_string(),
                department: "Finance".to_string(),
                location: "Colombo".to_string(),
                openings: 2,
                contact_email: "finance@example.com".to_string(),
            }],
            interviews: vec![],
        };
        let recorder = Arc::new(Recorder::default());
        let controller = DialogueController::new(
            Arc::new(InMemoryConversationStore::unbounded()),
            Arc::new(lookup),
            recorder.clone(),
            config,
        );
        (controller, recorder)
    }

    fn text(t: &str) -> InboundEvent {
        InboundEvent::TextMessage {
            user_id: "u1".to_string(),
            chat_id: "c1".to_string(),
            text: t.to_string(),
        }
    }

    fn upload(name: &str) -> InboundEvent {
        InboundEvent::DocumentUpload {
            user_id: "u1".to_string(),
            chat_id: "c1".to_string(),
            file_id: "file-1".to_string(),
            file_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_email_relay_goes_to_job_contact() {
        let (controller, recorder) = controller(RelayMode::Email);
        controller.handle(&text("apply for job id 101")).await;
        let turn = controller.handle(&upload("cv.pdf")).await;

        assert_eq!(turn.state, ConversationState::Done(JobId::new(101)));
        let relays = recorder.relays.lock();
        assert_eq!(relays.len(), 1);
        match &relays[0] {
            RelayDestination::Email { to, subject } => {
                assert_eq!(to, "finance@example.com");
                assert!(subject.contains("101"));
            }
            other => panic!("unexpected destination {:?}", other),
        }
        assert!(turn.replies()[0].contains("finance@example.com"));
    }

    #[tokio::test]
    async fn test_email_relay_falls_back_to_hr_for_unknown_job() {
        let (controller, recorder) = controller(RelayMode::Email);
        controller.handle(&text("apply for job id 5")).await;
        controller.handle(&upload("cv.pdf")).await;

        let relays = recorder.relays.lock();
        assert!(matches!(
            &relays[0],
            RelayDestination::Email { to, .. } if to == &ControllerConfig::default().hr_contact_email
        ));
    }

    #[tokio::test]
    async fn test_object_store_key_layout() {
        let (controller, recorder) = controller(RelayMode::ObjectStore);
        controller.handle(&text("apply for job id 101")).await;
        controller.handle(&upload("my/cv.pdf")).await;

        let relays = recorder.relays.lock();
        assert_eq!(
            relays[0],
            RelayDestination::ObjectStore {
                key: "resumes/101/u1-my_cv.pdf".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_contact_hr_uses_tracked_job() {
        let (controller, _) = controller(RelayMode::Email);
        let before = controller.handle(&text("contact hr")).await;
        assert!(before.replies()[0].contains("hr@example.com"));

        controller.handle(&text("apply for job id 101")).await;
        let after = controller.handle(&text("contact hr")).await;
        assert!(after.replies()[0].contains("finance@example.com"));
        assert_eq!(after.state.stage(), Stage::AwaitingResume);
    }

    #[tokio::test]
    async fn test_uppercase_pdf_extension_accepted() {
        let (controller, recorder) = controller(RelayMode::Email);
        controller.handle(&text("apply for job id 101")).await;
        let turn = controller.handle(&upload("CV.PDF")).await;
        assert_eq!(turn.state.stage(), Stage::Done);
        assert_eq!(recorder.relays.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_pdf_not_required_accepts_any_document() {
        let (controller, recorder) = controller_with(ControllerConfig {
            require_pdf: false,
            ..ControllerConfig::default()
        });
        controller.handle(&text("apply for job id 101")).await;
        let turn = controller.handle(&upload("resume.docx")).await;
        assert_eq!(turn.state.stage(), Stage::Done);
        assert_eq!(recorder.relays.lock().len(), 1);
    }
}
