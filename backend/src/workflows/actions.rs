// Workflow Actions - the typed action space
//
// Action types and configs are persisted with workflow definitions, so
// their wire form is part of the storage contract: SCREAMING_SNAKE_CASE
// type tags and camelCase config keys. A type tag outside the closed
// set (e.g. a stored workflow referencing a removed action) is not an
// error at this layer; dispatchers turn it into a failure result.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationActionType {
    SendEmail,
    SendSms,
    GenerateLetter,
}

impl CommunicationActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendEmail => "SEND_EMAIL",
            Self::SendSms => "SEND_SMS",
            Self::GenerateLetter => "GENERATE_LETTER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::SendEmail, Self::SendSms, Self::GenerateLetter]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskActionType {
    CreateTask,
    CompleteTask,
    AssignTask,
}

impl TaskActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTask => "CREATE_TASK",
            Self::CompleteTask => "COMPLETE_TASK",
            Self::AssignTask => "ASSIGN_TASK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::CreateTask, Self::CompleteTask, Self::AssignTask]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientActionType {
    UpdateClientStatus,
    AddTag,
    RemoveTag,
    AssignClient,
}

impl ClientActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateClientStatus => "UPDATE_CLIENT_STATUS",
            Self::AddTag => "ADD_TAG",
            Self::RemoveTag => "REMOVE_TAG",
            Self::AssignClient => "ASSIGN_CLIENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            Self::UpdateClientStatus,
            Self::AddTag,
            Self::RemoveTag,
            Self::AssignClient,
        ]
        .into_iter()
        .find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentActionType {
    UpdateDocumentStatus,
    RequestDocument,
}

impl DocumentActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateDocumentStatus => "UPDATE_DOCUMENT_STATUS",
            Self::RequestDocument => "REQUEST_DOCUMENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::UpdateDocumentStatus, Self::RequestDocument]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteActionType {
    CreateNote,
}

impl NoteActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateNote => "CREATE_NOTE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        (s == Self::CreateNote.as_str()).then_some(Self::CreateNote)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationActionType {
    SendNotification,
    LogActivity,
}

impl NotificationActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendNotification => "SEND_NOTIFICATION",
            Self::LogActivity => "LOG_ACTIVITY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::SendNotification, Self::LogActivity]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookActionType {
    CallWebhook,
}

impl WebhookActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CallWebhook => "CALL_WEBHOOK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        (s == Self::CallWebhook.as_str()).then_some(Self::CallWebhook)
    }
}

/// Config for SEND_EMAIL / SEND_SMS / GENERATE_LETTER. A template, when
/// given, supplies subject/body for the fields it defines; blank
/// template fields fall back to the config's own values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommunicationConfig {
    pub template_id: Option<Uuid>,
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// Config for CREATE_TASK / COMPLETE_TASK / ASSIGN_TASK.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskConfig {
    pub text: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    /// Due date as an offset from "now", in days. Takes precedence
    /// over `due_date`.
    pub due_days: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to_id: Option<Uuid>,
    pub assigned_to_role: Option<String>,
    pub task_id: Option<Uuid>,
}

/// Config for UPDATE_CLIENT_STATUS / ADD_TAG / REMOVE_TAG / ASSIGN_CLIENT.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub status: Option<String>,
    pub add_tags: Option<Vec<String>>,
    pub remove_tags: Option<Vec<String>>,
    pub assigned_to_id: Option<Uuid>,
}

/// Config for UPDATE_DOCUMENT_STATUS / REQUEST_DOCUMENT. Omitting
/// `document_id` on a status update makes it a bulk update across all
/// of the trigger client's documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentConfig {
    pub status: Option<String>,
    pub document_id: Option<Uuid>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub due_days: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

/// Config for CALL_WEBHOOK. `url` is the only required field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// JSON body template. Placeholder substitution runs on the raw
    /// text; the result must still parse as JSON.
    #[serde(default)]
    pub body_template: Option<String>,
    #[serde(default)]
    pub retry_on_failure: Option<bool>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub retry_delay_seconds: Option<u64>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Config for CREATE_NOTE.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteConfig {
    pub text: Option<String>,
    pub template_id: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
}

/// Config for SEND_NOTIFICATION.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationConfig {
    pub title: Option<String>,
    pub message: Option<String>,
    pub to_user_id: Option<Uuid>,
    pub to_role: Option<String>,
    pub link: Option<String>,
}

/// Config for LOG_ACTIVITY.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityConfig {
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
}
