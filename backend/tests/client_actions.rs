mod common;

use serde_json::json;
use uuid::Uuid;

use originate_shared::{ClientStatus, UserRole};

use common::harness;

#[tokio::test]
async fn update_client_status_records_transition() {
    let h = harness().await;

    let result = h
        .executor
        .execute_client_action(
            "UPDATE_CLIENT_STATUS",
            &json!({ "status": "UNDERWRITING" }),
            &h.ctx(),
        )
        .await;

    assert!(result.success, "{}", result.message);
    let data = result.data.unwrap();
    assert_eq!(data["from_status"], "PROCESSING");
    assert_eq!(data["to_status"], "UNDERWRITING");

    let client = h.store.get_client(h.client_id).await.unwrap();
    assert_eq!(client.status, ClientStatus::Underwriting);

    let activities = h.store.activities().await;
    assert_eq!(activities.len(), 1);
    let metadata = activities[0].metadata.clone().unwrap();
    assert_eq!(metadata["from_status"], "PROCESSING");
    assert_eq!(metadata["to_status"], "UNDERWRITING");
}

#[tokio::test]
async fn update_client_status_rejects_unknown_value() {
    let h = harness().await;

    let result = h
        .executor
        .execute_client_action(
            "UPDATE_CLIENT_STATUS",
            &json!({ "status": "FUNDED" }),
            &h.ctx(),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("Invalid client status 'FUNDED'"));
    assert!(result.message.contains("CLEAR_TO_CLOSE"));

    // Nothing changed, nothing audited.
    let client = h.store.get_client(h.client_id).await.unwrap();
    assert_eq!(client.status, ClientStatus::Processing);
    assert!(h.store.activities().await.is_empty());
}

#[tokio::test]
async fn tag_round_trip_restores_original_set() {
    let h = harness().await;
    let original = h.store.get_client(h.client_id).await.unwrap().tags;

    let added = h
        .executor
        .execute_client_action(
            "ADD_TAG",
            &json!({ "addTags": ["rush", "first-time-buyer"] }),
            &h.ctx(),
        )
        .await;
    assert!(added.success);

    let tags_after_add = h.store.get_client(h.client_id).await.unwrap().tags;
    assert!(tags_after_add.contains(&"rush".to_string()));
    assert!(tags_after_add.contains(&"refi".to_string()));
    assert_eq!(tags_after_add.len(), 3);

    let removed = h
        .executor
        .execute_client_action(
            "REMOVE_TAG",
            &json!({ "removeTags": ["rush", "first-time-buyer"] }),
            &h.ctx(),
        )
        .await;
    assert!(removed.success);

    let mut tags_after_remove = h.store.get_client(h.client_id).await.unwrap().tags;
    let mut expected = original;
    tags_after_remove.sort();
    expected.sort();
    assert_eq!(tags_after_remove, expected);
}

#[tokio::test]
async fn add_tag_deduplicates() {
    let h = harness().await;

    let result = h
        .executor
        .execute_client_action(
            "ADD_TAG",
            &json!({ "addTags": ["refi", "refi", "vip"] }),
            &h.ctx(),
        )
        .await;

    assert!(result.success);
    let tags = h.store.get_client(h.client_id).await.unwrap().tags;
    assert_eq!(tags.iter().filter(|t| *t == "refi").count(), 1);
    assert!(tags.contains(&"vip".to_string()));
}

#[tokio::test]
async fn empty_tag_list_is_a_validation_failure() {
    let h = harness().await;

    let result = h
        .executor
        .execute_client_action("ADD_TAG", &json!({ "addTags": [] }), &h.ctx())
        .await;
    assert!(!result.success);
    assert!(result.message.contains("addTags"));

    let result = h
        .executor
        .execute_client_action("REMOVE_TAG", &json!({}), &h.ctx())
        .await;
    assert!(!result.success);
    assert!(result.message.contains("removeTags"));
}

#[tokio::test]
async fn assign_client_changes_owner_and_logs_both() {
    let h = harness().await;
    let new_owner = h.seed_user("Pat Processor", UserRole::Processor, true).await;

    let result = h
        .executor
        .execute_client_action(
            "ASSIGN_CLIENT",
            &json!({ "assignedToId": new_owner }),
            &h.ctx(),
        )
        .await;

    assert!(result.success);
    let client = h.store.get_client(h.client_id).await.unwrap();
    assert_eq!(client.assigned_to, Some(new_owner));

    let activities = h.store.activities().await;
    let metadata = activities[0].metadata.clone().unwrap();
    assert!(metadata["from_user"].is_null());
    assert_eq!(metadata["to_user"].as_str().unwrap(), new_owner.to_string());
}

#[tokio::test]
async fn assign_client_requires_existing_user() {
    let h = harness().await;

    let result = h
        .executor
        .execute_client_action(
            "ASSIGN_CLIENT",
            &json!({ "assignedToId": Uuid::new_v4() }),
            &h.ctx(),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("not found"));
    assert!(h.store.get_client(h.client_id).await.unwrap().assigned_to.is_none());
}

#[tokio::test]
async fn unknown_client_action_type_is_a_failure_result() {
    let h = harness().await;

    let result = h
        .executor
        .execute_client_action("CHANGE_CLIENT_TIER", &json!({}), &h.ctx())
        .await;

    assert!(!result.success);
    assert_eq!(
        result.message,
        "Unknown client action type: CHANGE_CLIENT_TIER"
    );
}
