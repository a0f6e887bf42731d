// Action Executor - dispatches and runs workflow actions
//
// One public entry point per action category; each takes the raw
// `(action_type, config, context)` triple a persisted workflow supplies
// and returns an ActionResult. Entry points never return errors: an
// orchestrator running N actions always gets N results.

mod client;
mod communication;
mod document;
mod note;
mod notification;
mod task;
mod webhook;

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use originate_shared::{Activity, UserRole};

use crate::config::{Config, Environment, WebhookDefaults};
use crate::error::{EngineError, EngineResult};
use crate::services::{EmailService, EncryptionService};
use crate::store::DataStore;

use super::actions::{
    ClientActionType, CommunicationActionType, DocumentActionType, NoteActionType,
    NotificationActionType, TaskActionType, WebhookActionType,
};
use super::context::{ActionResult, ClientSnapshot, ExecutionContext, PlaceholderContext};

/// Audit activity type tags written by the executor.
pub mod activity_types {
    pub const COMMUNICATION_SENT: &str = "COMMUNICATION_SENT";
    pub const TASK_CREATED: &str = "TASK_CREATED";
    pub const TASK_COMPLETED: &str = "TASK_COMPLETED";
    pub const TASK_ASSIGNED: &str = "TASK_ASSIGNED";
    pub const CLIENT_STATUS_CHANGED: &str = "CLIENT_STATUS_CHANGED";
    pub const CLIENT_TAGS_UPDATED: &str = "CLIENT_TAGS_UPDATED";
    pub const CLIENT_ASSIGNED: &str = "CLIENT_ASSIGNED";
    pub const DOCUMENT_STATUS_UPDATED: &str = "DOCUMENT_STATUS_UPDATED";
    pub const DOCUMENT_REQUESTED: &str = "DOCUMENT_REQUESTED";
    pub const NOTE_CREATED: &str = "NOTE_CREATED";
    pub const NOTIFICATION_SENT: &str = "NOTIFICATION_SENT";
    pub const WEBHOOK_CALLED: &str = "WEBHOOK_CALLED";
    pub const WEBHOOK_FAILED: &str = "WEBHOOK_FAILED";
    pub const WORKFLOW_ACTION: &str = "WORKFLOW_ACTION";
    pub const WORKFLOW_ERROR: &str = "WORKFLOW_ERROR";
}

pub struct ActionExecutor {
    store: Arc<dyn DataStore>,
    encryption: EncryptionService,
    email: Option<EmailService>,
    http: reqwest::Client,
    environment: Environment,
    portal_base_url: String,
    webhook_defaults: WebhookDefaults,
}

impl ActionExecutor {
    pub fn new(
        store: Arc<dyn DataStore>,
        encryption: EncryptionService,
        email: Option<EmailService>,
        environment: Environment,
        portal_base_url: String,
        webhook_defaults: WebhookDefaults,
    ) -> Self {
        Self {
            store,
            encryption,
            email,
            http: reqwest::Client::new(),
            environment,
            portal_base_url,
            webhook_defaults,
        }
    }

    pub fn from_config(store: Arc<dyn DataStore>, config: &Config) -> EngineResult<Self> {
        let encryption = EncryptionService::new(&config.encryption_key)?;
        let email = if config.smtp.is_configured() {
            Some(EmailService::new(&config.smtp)?)
        } else {
            None
        };

        Ok(Self::new(
            store,
            encryption,
            email,
            config.environment,
            config.portal_base_url.clone(),
            config.webhook.clone(),
        ))
    }

    // ===== Category dispatch entry points =====

    pub async fn execute_communication_action(
        &self,
        action_type: &str,
        config: &serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ActionResult {
        let Some(action) = CommunicationActionType::parse(action_type) else {
            return ActionResult::fail(format!(
                "Unknown communication action type: {}",
                action_type
            ));
        };
        let config = match parse_config(config) {
            Ok(config) => config,
            Err(result) => return result,
        };

        info!("Executing workflow action {}", action.as_str());
        let result = self.execute_communication(action, &config, ctx).await;
        self.finish(action.as_str(), ctx, result).await
    }

    pub async fn execute_task_action(
        &self,
        action_type: &str,
        config: &serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ActionResult {
        let Some(action) = TaskActionType::parse(action_type) else {
            return ActionResult::fail(format!("Unknown task action type: {}", action_type));
        };
        let config = match parse_config(config) {
            Ok(config) => config,
            Err(result) => return result,
        };

        info!("Executing workflow action {}", action.as_str());
        let result = match action {
            TaskActionType::CreateTask => self.create_task(&config, ctx).await,
            TaskActionType::CompleteTask => self.complete_task(&config, ctx).await,
            TaskActionType::AssignTask => self.assign_task(&config, ctx).await,
        };
        self.finish(action.as_str(), ctx, result).await
    }

    pub async fn execute_client_action(
        &self,
        action_type: &str,
        config: &serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ActionResult {
        let Some(action) = ClientActionType::parse(action_type) else {
            return ActionResult::fail(format!("Unknown client action type: {}", action_type));
        };
        let config = match parse_config(config) {
            Ok(config) => config,
            Err(result) => return result,
        };

        info!("Executing workflow action {}", action.as_str());
        let result = match action {
            ClientActionType::UpdateClientStatus => self.update_client_status(&config, ctx).await,
            ClientActionType::AddTag => self.add_tags(&config, ctx).await,
            ClientActionType::RemoveTag => self.remove_tags(&config, ctx).await,
            ClientActionType::AssignClient => self.assign_client(&config, ctx).await,
        };
        self.finish(action.as_str(), ctx, result).await
    }

    pub async fn execute_document_action(
        &self,
        action_type: &str,
        config: &serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ActionResult {
        let Some(action) = DocumentActionType::parse(action_type) else {
            return ActionResult::fail(format!("Unknown document action type: {}", action_type));
        };
        let config = match parse_config(config) {
            Ok(config) => config,
            Err(result) => return result,
        };

        info!("Executing workflow action {}", action.as_str());
        let result = match action {
            DocumentActionType::UpdateDocumentStatus => {
                self.update_document_status(&config, ctx).await
            }
            DocumentActionType::RequestDocument => self.request_document(&config, ctx).await,
        };
        self.finish(action.as_str(), ctx, result).await
    }

    pub async fn execute_note_action(
        &self,
        action_type: &str,
        config: &serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ActionResult {
        let Some(action) = NoteActionType::parse(action_type) else {
            return ActionResult::fail(format!("Unknown note action type: {}", action_type));
        };
        let config = match parse_config(config) {
            Ok(config) => config,
            Err(result) => return result,
        };

        info!("Executing workflow action {}", action.as_str());
        let result = match action {
            NoteActionType::CreateNote => self.create_note(&config, ctx).await,
        };
        self.finish(action.as_str(), ctx, result).await
    }

    pub async fn execute_notification_action(
        &self,
        action_type: &str,
        config: &serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ActionResult {
        let Some(action) = NotificationActionType::parse(action_type) else {
            return ActionResult::fail(format!(
                "Unknown notification action type: {}",
                action_type
            ));
        };

        info!("Executing workflow action {}", action.as_str());
        let result = match action {
            NotificationActionType::SendNotification => {
                match parse_config(config) {
                    Ok(config) => self.send_notification(&config, ctx).await,
                    Err(result) => return result,
                }
            }
            NotificationActionType::LogActivity => match parse_config(config) {
                Ok(config) => self.log_activity(&config, ctx).await,
                Err(result) => return result,
            },
        };
        self.finish(action.as_str(), ctx, result).await
    }

    pub async fn execute_webhook_action(
        &self,
        action_type: &str,
        config: &serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ActionResult {
        let Some(action) = WebhookActionType::parse(action_type) else {
            return ActionResult::fail(format!("Unknown webhook action type: {}", action_type));
        };
        let config = match parse_config(config) {
            Ok(config) => config,
            Err(result) => return result,
        };

        info!("Executing workflow action {}", action.as_str());
        let result = match action {
            WebhookActionType::CallWebhook => self.call_webhook(&config, ctx).await,
        };
        self.finish(action.as_str(), ctx, result).await
    }

    // ===== Shared helpers =====

    /// Convert an executor outcome into the uniform result shape.
    /// Failures that happened after side effects began leave an audit
    /// trail entry; config/lookup failures do not.
    async fn finish(
        &self,
        action: &str,
        ctx: &ExecutionContext,
        result: EngineResult<ActionResult>,
    ) -> ActionResult {
        match result {
            Ok(result) => result,
            Err(e) => {
                warn!("Workflow action {} failed: {}", action, e);
                if e.audit_on_failure() {
                    self.record_activity(
                        Some(ctx.client_id),
                        Some(ctx.user_id),
                        activity_types::WORKFLOW_ERROR,
                        format!("Workflow action {} failed: {}", action, e),
                        Some(json!({ "action_type": action })),
                    )
                    .await;
                }
                ActionResult::fail(e.to_string())
            }
        }
    }

    /// Fetch and decrypt the trigger client. Called fresh by every
    /// executor so each action sees the effects of earlier ones.
    pub(crate) async fn client_snapshot(&self, client_id: Uuid) -> EngineResult<ClientSnapshot> {
        let client = self
            .store
            .find_client(client_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Client not found".to_string()))?;

        Ok(ClientSnapshot {
            id: client.id,
            name: self.encryption.decrypt(&client.name)?,
            email: self.encryption.decrypt(&client.email)?,
            phone: self.encryption.decrypt_opt(client.phone.as_deref())?,
            status: client.status,
            tags: client.tags,
        })
    }

    pub(crate) async fn placeholder_context(
        &self,
        ctx: &ExecutionContext,
    ) -> EngineResult<PlaceholderContext> {
        let client = self.client_snapshot(ctx.client_id).await?;
        Ok(PlaceholderContext::new(client, ctx.trigger_type))
    }

    /// Append an audit activity, best-effort: a store failure here is
    /// logged and swallowed so it can never fail the primary action.
    pub(crate) async fn record_activity(
        &self,
        client_id: Option<Uuid>,
        user_id: Option<Uuid>,
        activity_type: &str,
        description: String,
        metadata: Option<serde_json::Value>,
    ) {
        let activity = Activity {
            id: Uuid::new_v4(),
            client_id,
            user_id,
            activity_type: activity_type.to_string(),
            description,
            metadata,
            created_at: Utc::now(),
        };

        if let Err(e) = self.store.create_activity(activity).await {
            warn!("Failed to record workflow activity: {}", e);
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    pub(crate) fn email(&self) -> Option<&EmailService> {
        self.email.as_ref()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn environment(&self) -> Environment {
        self.environment
    }

    pub(crate) fn portal_base_url(&self) -> &str {
        &self.portal_base_url
    }

    pub(crate) fn webhook_defaults(&self) -> &WebhookDefaults {
        &self.webhook_defaults
    }
}

fn parse_config<T: DeserializeOwned>(config: &serde_json::Value) -> Result<T, ActionResult> {
    serde_json::from_value(config.clone())
        .map_err(|e| ActionResult::fail(format!("Invalid action config: {}", e)))
}

pub(crate) fn parse_role(role: &str) -> EngineResult<UserRole> {
    UserRole::parse(role).ok_or_else(|| {
        EngineError::Validation(format!(
            "Invalid role '{}'. Valid options: {}",
            role,
            UserRole::valid_values()
        ))
    })
}

/// Non-empty-after-trim filter used when resolving optional text fields.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Due dates come either as a day offset from "now" (which wins) or as
/// a literal timestamp.
pub(crate) fn resolve_due_date(
    due_days: Option<i64>,
    due_date: Option<chrono::DateTime<Utc>>,
) -> Option<chrono::DateTime<Utc>> {
    match due_days {
        Some(days) => Some(Utc::now() + chrono::Duration::days(days)),
        None => due_date,
    }
}
