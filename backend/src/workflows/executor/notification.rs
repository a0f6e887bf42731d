// Notification executors: SEND_NOTIFICATION / LOG_ACTIVITY

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use originate_shared::{Activity, Notification};

use crate::error::{EngineError, EngineResult};
use crate::workflows::actions::{ActivityConfig, NotificationConfig};
use crate::workflows::context::{ActionResult, ExecutionContext};
use crate::workflows::templates::render;

use super::{activity_types, non_blank, parse_role, ActionExecutor};

impl ActionExecutor {
    pub(crate) async fn send_notification(
        &self,
        config: &NotificationConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let message = non_blank(config.message.clone())
            .ok_or_else(|| EngineError::Validation("message is required".to_string()))?;
        let title = non_blank(config.title.clone())
            .unwrap_or_else(|| "Workflow notification".to_string());

        let placeholder_ctx = self.placeholder_context(ctx).await?;
        let rendered_title = render(&title, &placeholder_ctx);
        let rendered_message = render(&message, &placeholder_ctx);

        // Recipient resolution: explicit user, else everyone active in
        // the role, else whoever triggered the workflow.
        let recipients: Vec<Uuid> = if let Some(user_id) = config.to_user_id {
            match self.store().find_user(user_id).await? {
                Some(user) => vec![user.id],
                None => Vec::new(),
            }
        } else if let Some(role_str) = config.to_role.as_deref() {
            let role = parse_role(role_str)?;
            self.store()
                .find_active_by_role(role)
                .await?
                .into_iter()
                .map(|u| u.id)
                .collect()
        } else {
            vec![ctx.user_id]
        };

        if recipients.is_empty() {
            return Err(EngineError::NotFound(
                "No recipients resolved for notification".to_string(),
            ));
        }

        let link = non_blank(config.link.clone())
            .unwrap_or_else(|| self.client_link(ctx.client_id));

        // One record per recipient, created concurrently, best-effort.
        let creations = recipients.iter().map(|user_id| {
            let store = Arc::clone(self.store());
            let notification = Notification {
                id: Uuid::new_v4(),
                user_id: *user_id,
                title: rendered_title.clone(),
                message: rendered_message.clone(),
                link: Some(link.clone()),
                read: false,
                created_at: Utc::now(),
            };
            async move { store.create_notification(notification).await }
        });

        let mut notification_ids: Vec<Uuid> = Vec::new();
        for outcome in join_all(creations).await {
            match outcome {
                Ok(notification) => notification_ids.push(notification.id),
                Err(e) => warn!("Failed to create notification record: {}", e),
            }
        }

        if notification_ids.is_empty() {
            return Err(EngineError::Internal(
                "failed to create any notification records".to_string(),
            ));
        }

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::NOTIFICATION_SENT,
            format!("Workflow notified {} user(s)", notification_ids.len()),
            Some(json!({
                "count": notification_ids.len(),
                "notification_ids": notification_ids,
            })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("Notified {} user(s)", notification_ids.len()),
            json!({
                "count": notification_ids.len(),
                "notification_ids": notification_ids,
                "recipients": recipients,
            }),
        ))
    }

    /// The engine's escape hatch for custom audit entries. Unlike the
    /// activity records other executors append, this write IS the
    /// action; a store failure fails it.
    pub(crate) async fn log_activity(
        &self,
        config: &ActivityConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let description = non_blank(config.description.clone())
            .ok_or_else(|| EngineError::Validation("description is required".to_string()))?;
        let activity_type = non_blank(config.activity_type.clone())
            .unwrap_or_else(|| activity_types::WORKFLOW_ACTION.to_string());

        let activity = self
            .store()
            .create_activity(Activity {
                id: Uuid::new_v4(),
                client_id: Some(ctx.client_id),
                user_id: Some(ctx.user_id),
                activity_type: activity_type.clone(),
                description,
                metadata: config.metadata.clone(),
                created_at: Utc::now(),
            })
            .await?;

        Ok(ActionResult::ok_with(
            "Activity logged",
            json!({ "activity_id": activity.id, "type": activity_type }),
        ))
    }
}
