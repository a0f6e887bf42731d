mod common;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use originate_shared::{Client, ClientStatus, DocumentStatus};

use common::harness;

#[tokio::test]
async fn bulk_update_touches_every_client_document() {
    let h = harness().await;
    let a = h.seed_document(h.client_id, "W-2", DocumentStatus::Uploaded).await;
    let b = h.seed_document(h.client_id, "Pay stub", DocumentStatus::Uploaded).await;
    let c = h.seed_document(h.client_id, "Bank statement", DocumentStatus::Uploaded).await;

    let result = h
        .executor
        .execute_document_action(
            "UPDATE_DOCUMENT_STATUS",
            &json!({ "status": "UNDER_REVIEW" }),
            &h.ctx(),
        )
        .await;

    assert!(result.success, "{}", result.message);
    let data = result.data.unwrap();
    assert_eq!(data["count"], 3);

    for id in [a, b, c] {
        assert_eq!(
            h.store.get_document(id).await.unwrap().status,
            DocumentStatus::UnderReview
        );
    }

    // One aggregate audit entry, not three.
    let activities = h.store.activities().await;
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].metadata.clone().unwrap()["count"], 3);
}

#[tokio::test]
async fn single_update_rejects_foreign_document() {
    let h = harness().await;

    // A document that belongs to some other client.
    let other_client = Uuid::new_v4();
    h.store
        .insert_client(Client {
            id: other_client,
            name: h.encryption.encrypt("Sam Roe").unwrap(),
            email: h.encryption.encrypt("sam.roe@example.com").unwrap(),
            phone: None,
            status: ClientStatus::Lead,
            tags: vec![],
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: None,
        })
        .await;
    let foreign_doc = h.seed_document(other_client, "W-2", DocumentStatus::Uploaded).await;

    let result = h
        .executor
        .execute_document_action(
            "UPDATE_DOCUMENT_STATUS",
            &json!({ "status": "APPROVED", "documentId": foreign_doc }),
            &h.ctx(),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("does not belong to trigger client"));
    assert_eq!(
        h.store.get_document(foreign_doc).await.unwrap().status,
        DocumentStatus::Uploaded
    );
    assert!(h.store.activities().await.is_empty());
}

#[tokio::test]
async fn single_update_changes_one_document() {
    let h = harness().await;
    let target = h.seed_document(h.client_id, "W-2", DocumentStatus::Uploaded).await;
    let untouched = h.seed_document(h.client_id, "Pay stub", DocumentStatus::Uploaded).await;

    let result = h
        .executor
        .execute_document_action(
            "UPDATE_DOCUMENT_STATUS",
            &json!({ "status": "APPROVED", "documentId": target }),
            &h.ctx(),
        )
        .await;

    assert!(result.success);
    assert_eq!(
        h.store.get_document(target).await.unwrap().status,
        DocumentStatus::Approved
    );
    assert_eq!(
        h.store.get_document(untouched).await.unwrap().status,
        DocumentStatus::Uploaded
    );
}

#[tokio::test]
async fn update_status_rejects_unknown_value() {
    let h = harness().await;

    let result = h
        .executor
        .execute_document_action(
            "UPDATE_DOCUMENT_STATUS",
            &json!({ "status": "SHREDDED" }),
            &h.ctx(),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("Invalid document status 'SHREDDED'"));
    assert!(result.message.contains("UNDER_REVIEW"));
}

#[tokio::test]
async fn request_document_creates_placeholder_with_default_name() {
    let h = harness().await;

    let result = h
        .executor
        .execute_document_action(
            "REQUEST_DOCUMENT",
            &json!({ "category": "INCOME", "dueDays": 7 }),
            &h.ctx(),
        )
        .await;

    assert!(result.success, "{}", result.message);
    let data = result.data.unwrap();
    assert_eq!(data["name"], "Income Document");

    let document_id: Uuid = data["document_id"].as_str().unwrap().parse().unwrap();
    let document = h.store.get_document(document_id).await.unwrap();
    assert_eq!(document.status, DocumentStatus::Requested);
    assert!(document.file_name.is_none());
    assert!(document.file_path.is_none());
    assert!(document.due_date.is_some());
}

#[tokio::test]
async fn request_document_outside_production_surfaces_notification() {
    let h = harness().await;

    let result = h
        .executor
        .execute_document_action(
            "REQUEST_DOCUMENT",
            &json!({
                "category": "ASSETS",
                "message": "{{client_name}}, please send your statements."
            }),
            &h.ctx(),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.data.unwrap()["email_sent"], false);

    // The rendered message landed as an in-app notification rather
    // than an outbound email.
    let notifications = h.store.notifications().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, h.user_id);
    assert_eq!(
        notifications[0].message,
        "Jane Doe, please send your statements."
    );
}

#[tokio::test]
async fn request_document_rejects_unknown_category() {
    let h = harness().await;

    let result = h
        .executor
        .execute_document_action(
            "REQUEST_DOCUMENT",
            &json!({ "category": "TAXES" }),
            &h.ctx(),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("Invalid document category 'TAXES'"));
}

#[tokio::test]
async fn unknown_document_action_type_is_a_failure_result() {
    let h = harness().await;

    let result = h
        .executor
        .execute_document_action("SHRED_DOCUMENT", &json!({}), &h.ctx())
        .await;

    assert!(!result.success);
    assert_eq!(result.message, "Unknown document action type: SHRED_DOCUMENT");
}
