mod common;

use serde_json::json;
use uuid::Uuid;

use originate_shared::CommunicationChannel;

use common::harness;

#[tokio::test]
async fn send_email_records_rendered_communication_as_sent() {
    let h = harness().await;

    let result = h
        .executor
        .execute_communication_action(
            "SEND_EMAIL",
            &json!({
                "subject": "Update for {{client_name}}",
                "body": "Hi {{client_name}}, your file is now {{client_status}}."
            }),
            &h.ctx(),
        )
        .await;

    assert!(result.success, "{}", result.message);
    let data = result.data.unwrap();
    assert_eq!(data["channel"], "EMAIL");
    assert_eq!(data["recipient"], "jane.doe@example.com");
    assert_eq!(data["subject"], "Update for Jane Doe");
    assert_eq!(data["body"], "Hi Jane Doe, your file is now PROCESSING.");

    let communications = h.store.communications().await;
    assert_eq!(communications.len(), 1);
    assert_eq!(communications[0].status.as_str(), "SENT");
    assert_eq!(communications[0].recipient, "jane.doe@example.com");

    assert_eq!(h.activity_types().await, vec!["COMMUNICATION_SENT".to_string()]);
}

#[tokio::test]
async fn send_email_with_sms_template_is_a_type_mismatch() {
    let h = harness().await;
    let sms_template = h
        .seed_communication_template(CommunicationChannel::Sms, None, "Reply YES to confirm")
        .await;

    let result = h
        .executor
        .execute_communication_action(
            "SEND_EMAIL",
            &json!({ "templateId": sms_template }),
            &h.ctx(),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("Template type mismatch"));
    assert!(result.message.contains("SMS"));
    // No communication record was created.
    assert!(h.store.communications().await.is_empty());
}

#[tokio::test]
async fn template_overrides_config_but_blank_fields_fall_back() {
    let h = harness().await;
    // Template defines a body but no subject.
    let template = h
        .seed_communication_template(
            CommunicationChannel::Email,
            None,
            "Dear {{client_name}}, your documents are due.",
        )
        .await;

    let result = h
        .executor
        .execute_communication_action(
            "SEND_EMAIL",
            &json!({
                "templateId": template,
                "subject": "Document reminder",
                "body": "This body is superseded by the template."
            }),
            &h.ctx(),
        )
        .await;

    assert!(result.success);
    let data = result.data.unwrap();
    assert_eq!(data["subject"], "Document reminder");
    assert_eq!(data["body"], "Dear Jane Doe, your documents are due.");
}

#[tokio::test]
async fn missing_body_is_a_validation_failure() {
    let h = harness().await;

    let result = h
        .executor
        .execute_communication_action(
            "SEND_EMAIL",
            &json!({ "subject": "No body here" }),
            &h.ctx(),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("body is required"));
    assert!(h.store.communications().await.is_empty());
}

#[tokio::test]
async fn send_sms_uses_client_phone() {
    let h = harness().await;

    let result = h
        .executor
        .execute_communication_action(
            "SEND_SMS",
            &json!({ "body": "Your loan status: {{client_status}}" }),
            &h.ctx(),
        )
        .await;

    assert!(result.success);
    let data = result.data.unwrap();
    assert_eq!(data["recipient"], "555-0100");
    assert_eq!(data["body"], "Your loan status: PROCESSING");
}

#[tokio::test]
async fn config_to_overrides_client_contact() {
    let h = harness().await;

    let result = h
        .executor
        .execute_communication_action(
            "SEND_EMAIL",
            &json!({ "to": "cosigner@example.com", "body": "Please review." }),
            &h.ctx(),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.data.unwrap()["recipient"], "cosigner@example.com");
}

#[tokio::test]
async fn missing_template_is_reported() {
    let h = harness().await;

    let result = h
        .executor
        .execute_communication_action(
            "SEND_EMAIL",
            &json!({ "templateId": Uuid::new_v4(), "body": "fallback" }),
            &h.ctx(),
        )
        .await;

    assert!(!result.success);
    assert!(result.message.contains("not found"));
}

#[tokio::test]
async fn generate_letter_records_letter_channel() {
    let h = harness().await;

    let result = h
        .executor
        .execute_communication_action(
            "GENERATE_LETTER",
            &json!({ "subject": "Pre-approval", "body": "To whom it may concern: {{client_name}} is pre-approved." }),
            &h.ctx(),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.data.unwrap()["channel"], "LETTER");
}

#[tokio::test]
async fn unknown_communication_action_type_is_a_failure_result() {
    let h = harness().await;

    let result = h
        .executor
        .execute_communication_action("SEND_FAX", &json!({}), &h.ctx())
        .await;

    assert!(!result.success);
    assert_eq!(result.message, "Unknown communication action type: SEND_FAX");
}
