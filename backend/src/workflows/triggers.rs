// Workflow Triggers - Event types that can start workflow execution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of CRM events that can trigger workflows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    // Client triggers
    ClientCreated,
    ClientStatusChanged,

    // Document triggers
    DocumentUploaded,
    DocumentStatusChanged,

    // Task triggers
    TaskDue,
    TaskCompleted,

    // Note triggers
    NoteAdded,

    // Schedule triggers
    Scheduled,

    // Integration triggers
    WebhookReceived,

    // Custom triggers
    Manual,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientCreated => "CLIENT_CREATED",
            Self::ClientStatusChanged => "CLIENT_STATUS_CHANGED",
            Self::DocumentUploaded => "DOCUMENT_UPLOADED",
            Self::DocumentStatusChanged => "DOCUMENT_STATUS_CHANGED",
            Self::TaskDue => "TASK_DUE",
            Self::TaskCompleted => "TASK_COMPLETED",
            Self::NoteAdded => "NOTE_ADDED",
            Self::Scheduled => "SCHEDULED",
            Self::WebhookReceived => "WEBHOOK_RECEIVED",
            Self::Manual => "MANUAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            Self::ClientCreated,
            Self::ClientStatusChanged,
            Self::DocumentUploaded,
            Self::DocumentStatusChanged,
            Self::TaskDue,
            Self::TaskCompleted,
            Self::NoteAdded,
            Self::Scheduled,
            Self::WebhookReceived,
            Self::Manual,
        ]
        .into_iter()
        .find(|v| v.as_str() == s)
    }
}

/// A trigger event handed to the engine by whatever observed it (CRUD
/// handlers, the scheduler, an inbound webhook endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub event_id: Uuid,
    pub trigger_type: TriggerType,
    pub client_id: Uuid,
    pub user_id: Uuid,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl TriggerEvent {
    pub fn new(
        trigger_type: TriggerType,
        client_id: Uuid,
        user_id: Uuid,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            trigger_type,
            client_id,
            user_id,
            payload,
            timestamp: Utc::now(),
        }
    }

    pub fn client_status_changed(
        client_id: Uuid,
        user_id: Uuid,
        from_status: &str,
        to_status: &str,
    ) -> Self {
        Self::new(
            TriggerType::ClientStatusChanged,
            client_id,
            user_id,
            serde_json::json!({
                "from_status": from_status,
                "to_status": to_status,
            }),
        )
    }

    pub fn document_uploaded(client_id: Uuid, user_id: Uuid, document_id: Uuid, category: &str) -> Self {
        Self::new(
            TriggerType::DocumentUploaded,
            client_id,
            user_id,
            serde_json::json!({
                "document_id": document_id,
                "category": category,
            }),
        )
    }

    pub fn task_due(client_id: Uuid, user_id: Uuid, task_id: Uuid, due_date: DateTime<Utc>) -> Self {
        Self::new(
            TriggerType::TaskDue,
            client_id,
            user_id,
            serde_json::json!({
                "task_id": task_id,
                "due_date": due_date,
            }),
        )
    }

    pub fn scheduled(client_id: Uuid, user_id: Uuid, schedule: &str) -> Self {
        Self::new(
            TriggerType::Scheduled,
            client_id,
            user_id,
            serde_json::json!({ "schedule": schedule }),
        )
    }

    pub fn webhook_received(client_id: Uuid, user_id: Uuid, payload: serde_json::Value) -> Self {
        Self::new(TriggerType::WebhookReceived, client_id, user_id, payload)
    }

    pub fn manual(client_id: Uuid, user_id: Uuid) -> Self {
        Self::new(TriggerType::Manual, client_id, user_id, serde_json::json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_type_round_trip() {
        let all = [
            TriggerType::ClientCreated,
            TriggerType::ClientStatusChanged,
            TriggerType::DocumentUploaded,
            TriggerType::DocumentStatusChanged,
            TriggerType::TaskDue,
            TriggerType::TaskCompleted,
            TriggerType::NoteAdded,
            TriggerType::Scheduled,
            TriggerType::WebhookReceived,
            TriggerType::Manual,
        ];
        for trigger in all {
            assert_eq!(TriggerType::parse(trigger.as_str()), Some(trigger));
        }
        assert_eq!(TriggerType::parse("LOAN_FUNDED"), None);
    }

    #[test]
    fn test_event_constructors() {
        let client_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let event = TriggerEvent::client_status_changed(client_id, user_id, "LEAD", "ACTIVE");
        assert_eq!(event.trigger_type, TriggerType::ClientStatusChanged);
        assert_eq!(event.payload["to_status"], "ACTIVE");

        let event = TriggerEvent::manual(client_id, user_id);
        assert_eq!(event.trigger_type, TriggerType::Manual);
    }
}
