// Execution context and the uniform action result contract

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use originate_shared::ClientStatus;

use super::triggers::TriggerType;

/// The read-only value threaded through every executor in a workflow
/// run. Built once by the orchestrator from the trigger event and
/// never mutated by actions.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub client_id: Uuid,
    pub trigger_type: TriggerType,
    pub trigger_data: serde_json::Value,
    pub user_id: Uuid,
}

impl ExecutionContext {
    pub fn new(
        client_id: Uuid,
        trigger_type: TriggerType,
        trigger_data: serde_json::Value,
        user_id: Uuid,
    ) -> Self {
        Self {
            client_id,
            trigger_type,
            trigger_data,
            user_id,
        }
    }
}

/// Decrypted client fields fetched fresh for one action invocation.
/// Never cached across actions; every executor re-fetches so it sees
/// the effects of earlier actions in the same run.
#[derive(Debug, Clone)]
pub struct ClientSnapshot {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub tags: Vec<String>,
}

/// Everything placeholder substitution can draw from: the trigger
/// context plus the decrypted client snapshot.
#[derive(Debug, Clone)]
pub struct PlaceholderContext {
    pub client: ClientSnapshot,
    pub trigger_type: TriggerType,
}

impl PlaceholderContext {
    pub fn new(client: ClientSnapshot, trigger_type: TriggerType) -> Self {
        Self {
            client,
            trigger_type,
        }
    }
}

/// The uniform return contract for every executor. Executors never
/// panic or return errors past their boundary; internal failures are
/// converted into `success: false` with a readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn fail_with(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_result_shapes() {
        let ok = ActionResult::ok("Task created");
        assert!(ok.success);
        assert!(ok.data.is_none());

        let ok = ActionResult::ok_with("Task created", json!({ "task_id": "t1" }));
        assert_eq!(ok.data.unwrap()["task_id"], "t1");

        let fail = ActionResult::fail("text is required");
        assert!(!fail.success);
        assert_eq!(fail.message, "text is required");
    }

    #[test]
    fn test_action_result_serialization_omits_empty_data() {
        let serialized = serde_json::to_value(ActionResult::ok("done")).unwrap();
        assert!(serialized.get("data").is_none());
        assert_eq!(serialized["success"], true);
    }
}
