// Document executors: UPDATE_DOCUMENT_STATUS / REQUEST_DOCUMENT
//
// A status update without a documentId is a bulk update across every
// document of the trigger client; with one, the document must belong
// to that client.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use originate_shared::{Document, DocumentCategory, DocumentStatus, Notification};

use crate::error::{EngineError, EngineResult};
use crate::workflows::actions::DocumentConfig;
use crate::workflows::context::{ActionResult, ExecutionContext};
use crate::workflows::templates::render;

use super::{activity_types, non_blank, resolve_due_date, ActionExecutor};

impl ActionExecutor {
    pub(crate) async fn update_document_status(
        &self,
        config: &DocumentConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let status_str = config
            .status
            .as_deref()
            .ok_or_else(|| EngineError::Validation("status is required".to_string()))?;
        let status = DocumentStatus::parse(status_str).ok_or_else(|| {
            EngineError::Validation(format!(
                "Invalid document status '{}'. Valid options: {}",
                status_str,
                DocumentStatus::valid_values()
            ))
        })?;

        match config.document_id {
            Some(document_id) => self.update_single_document(document_id, status, ctx).await,
            None => self.update_all_client_documents(status, ctx).await,
        }
    }

    async fn update_single_document(
        &self,
        document_id: Uuid,
        status: DocumentStatus,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let document = self
            .store()
            .find_document(document_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Document {} not found", document_id)))?;

        if document.client_id != ctx.client_id {
            return Err(EngineError::Ownership(format!(
                "Document {} does not belong to trigger client",
                document_id
            )));
        }

        let from_status = document.status;
        self.store()
            .update_document_status(document_id, status)
            .await?;

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::DOCUMENT_STATUS_UPDATED,
            format!(
                "Workflow set document '{}' to {}",
                document.name,
                status.as_str()
            ),
            Some(json!({
                "document_id": document_id,
                "from_status": from_status.as_str(),
                "to_status": status.as_str(),
            })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("Document status updated to {}", status.as_str()),
            json!({ "document_id": document_id, "status": status.as_str() }),
        ))
    }

    async fn update_all_client_documents(
        &self,
        status: DocumentStatus,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let documents = self
            .store()
            .find_documents_by_client(ctx.client_id)
            .await?;

        // Best-effort fan-out: per-document updates run concurrently
        // and one failure does not abort the rest.
        let updates = documents.iter().map(|document| {
            let store = Arc::clone(self.store());
            let id = document.id;
            async move { (id, store.update_document_status(id, status).await) }
        });

        let mut updated: Vec<Uuid> = Vec::new();
        let mut failed: Vec<Uuid> = Vec::new();
        for (id, outcome) in join_all(updates).await {
            match outcome {
                Ok(true) => updated.push(id),
                Ok(false) => failed.push(id),
                Err(e) => {
                    warn!("Bulk document update failed for {}: {}", id, e);
                    failed.push(id);
                }
            }
        }

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::DOCUMENT_STATUS_UPDATED,
            format!(
                "Workflow set {} document(s) to {}",
                updated.len(),
                status.as_str()
            ),
            Some(json!({
                "count": updated.len(),
                "document_ids": updated,
                "to_status": status.as_str(),
            })),
        )
        .await;

        let count = updated.len();
        let mut data = json!({
            "count": count,
            "document_ids": updated,
            "status": status.as_str(),
        });
        if !failed.is_empty() {
            data["failed_document_ids"] = json!(failed);
        }

        Ok(ActionResult::ok_with(
            format!("Updated {} document(s) to {}", count, status.as_str()),
            data,
        ))
    }

    pub(crate) async fn request_document(
        &self,
        config: &DocumentConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let category_str = config
            .category
            .as_deref()
            .ok_or_else(|| EngineError::Validation("category is required".to_string()))?;
        let category = DocumentCategory::parse(category_str).ok_or_else(|| {
            EngineError::Validation(format!(
                "Invalid document category '{}'. Valid options: {}",
                category_str,
                DocumentCategory::valid_values()
            ))
        })?;

        let placeholder_ctx = self.placeholder_context(ctx).await?;

        let name = non_blank(config.name.clone())
            .unwrap_or_else(|| format!("{} Document", category.display_name()));
        let due_date = resolve_due_date(config.due_days, config.due_date);

        // Placeholder record: no file yet, just the request.
        let document = self
            .store()
            .create_document(Document {
                id: Uuid::new_v4(),
                client_id: ctx.client_id,
                name: name.clone(),
                category,
                status: DocumentStatus::Requested,
                file_name: None,
                file_path: None,
                file_size: None,
                due_date,
                created_at: Utc::now(),
                updated_at: None,
            })
            .await?;

        let message = non_blank(config.message.clone()).unwrap_or_else(|| {
            format!(
                "Hi {{{{client_name}}}}, please upload your {} for your loan file.",
                name
            )
        });
        let rendered_message = render(&message, &placeholder_ctx);

        // Outside production the request email is deliberately not
        // sent; the rendered message surfaces as an in-app
        // notification instead.
        let email_sent = match (self.environment().is_production(), self.email()) {
            (true, Some(email)) => {
                email
                    .send_email(
                        &placeholder_ctx.client.email,
                        &format!("Document requested: {}", name),
                        &rendered_message,
                    )
                    .await?;
                true
            }
            _ => {
                self.store()
                    .create_notification(Notification {
                        id: Uuid::new_v4(),
                        user_id: ctx.user_id,
                        title: format!("Document requested: {}", name),
                        message: rendered_message.clone(),
                        link: Some(self.client_link(ctx.client_id)),
                        read: false,
                        created_at: Utc::now(),
                    })
                    .await?;
                false
            }
        };

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::DOCUMENT_REQUESTED,
            format!("Workflow requested document '{}'", name),
            Some(json!({
                "document_id": document.id,
                "category": category.as_str(),
                "email_sent": email_sent,
            })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("Document '{}' requested", name),
            json!({
                "document_id": document.id,
                "name": name,
                "category": category.as_str(),
                "due_date": due_date,
                "email_sent": email_sent,
            }),
        ))
    }

    pub(crate) fn client_link(&self, client_id: Uuid) -> String {
        format!("{}/clients/{}", self.portal_base_url(), client_id)
    }
}
