//! Component wiring from settings

use std::sync::Arc;

use hr_assistant_agent::{
    ControllerConfig, DialogueController, InMemoryConversationStore, IntentClassifier,
    LeaveEntitlementResponder,
};
use hr_assistant_config::{IntentRulesConfig, Settings};
use hr_assistant_persistence::open_lookup;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("data source: {0}")]
    Data(#[from] hr_assistant_persistence::PersistenceError),

    #[error("delivery: {0}")]
    Delivery(#[from] hr_assistant_core::DeliveryError),

    #[error("intent rules: {0}")]
    IntentRules(String),
}

/// Build the dialogue controller and its collaborators
pub fn build_controller(settings: &Settings) -> Result<Arc<DialogueController>, ServerError> {
    let lookup = open_lookup(&settings.data)?;
    let gateway = hr_assistant_delivery::build_gateway(settings)?;
    let store = Arc::new(InMemoryConversationStore::new(
        settings.conversation.retention_policy(),
    ));

    let classifier = match &settings.intent_rules_path {
        Some(path) => {
            let rules = IntentRulesConfig::load(path)
                .map_err(|e| ServerError::IntentRules(e.to_string()))?;
            tracing::info!(path = %path.display(), rules = rules.rules.len(), "Loaded intent rules");
            IntentClassifier::from_config(&rules)
                .map_err(|e| ServerError::IntentRules(e.to_string()))?
        }
        None => IntentClassifier::default(),
    };

    let fallback = LeaveEntitlementResponder::new(
        lookup.clone(),
        settings.templates.clone(),
        settings.conversation.collaborator_timeout(),
    );

    let controller = DialogueController::new(
        store,
        lookup,
        gateway,
        ControllerConfig::from_settings(settings),
    )
    .with_classifier(classifier)
    .with_templates(settings.templates.clone())
    .with_fallback(Arc::new(fallback));

    Ok(Arc::new(controller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hr_assistant_core::{ConversationState, InboundEvent};
    use std::io::Write;

    fn offline_settings() -> Settings {
        let mut settings = Settings::default();
        settings.telegram.enabled = false;
        settings
    }

    #[tokio::test]
    async fn test_builds_offline_controller() {
        let controller = build_controller(&offline_settings()).unwrap();
        let turn = controller
            .handle_and_dispatch(&InboundEvent::TextMessage {
                user_id: "1".to_string(),
                chat_id: "1".to_string(),
                text: "job openings".to_string(),
            })
            .await;
        assert_eq!(turn.state, ConversationState::Listing);
        assert!(turn.replies()[0].contains("Software Engineer"));
    }

    #[tokio::test]
    async fn test_leave_questions_reach_staff_table() {
        let controller = build_controller(&offline_settings()).unwrap();
        let turn = controller
            .handle(&InboundEvent::TextMessage {
                user_id: "1".to_string(),
                chat_id: "1".to_string(),
                text: "E1001 how much annual leave do I have".to_string(),
            })
            .await;
        assert!(turn.replies()[0].contains("14"));
    }

    #[tokio::test]
    async fn test_unmatched_chatter_gets_help_not_staff_names() {
        let controller = build_controller(&offline_settings()).unwrap();
        let help = hr_assistant_config::ReplyTemplates::default().help;
        for text in ["I need help with my payslip", "a question about benefits"] {
            let turn = controller
                .handle(&InboundEvent::TextMessage {
                    user_id: "7".to_string(),
                    chat_id: "7".to_string(),
                    text: text.to_string(),
                })
                .await;
            assert_eq!(turn.replies(), vec![help.as_str()], "{}", text);
        }
    }

    #[test]
    fn test_custom_intent_rules_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "rules:\n  - intent: greeting\n    exact_any: [\"ayubowan\"]"
        )
        .unwrap();
        let mut settings = offline_settings();
        settings.intent_rules_path = Some(file.path().to_path_buf());
        assert!(build_controller(&settings).is_ok());

        settings.intent_rules_path = Some("/nonexistent/rules.yaml".into());
        assert!(matches!(
            build_controller(&settings),
            Err(ServerError::IntentRules(_))
        ));
    }
}
