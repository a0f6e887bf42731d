use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline status of a client (borrower) record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
    Lead,
    PreQualified,
    Active,
    Processing,
    Underwriting,
    ClearToClose,
    Closed,
    Denied,
    Inactive,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 9] = [
        Self::Lead,
        Self::PreQualified,
        Self::Active,
        Self::Processing,
        Self::Underwriting,
        Self::ClearToClose,
        Self::Closed,
        Self::Denied,
        Self::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "LEAD",
            Self::PreQualified => "PRE_QUALIFIED",
            Self::Active => "ACTIVE",
            Self::Processing => "PROCESSING",
            Self::Underwriting => "UNDERWRITING",
            Self::ClearToClose => "CLEAR_TO_CLOSE",
            Self::Closed => "CLOSED",
            Self::Denied => "DENIED",
            Self::Inactive => "INACTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// Comma-separated list of every valid wire value, for error messages.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Review status of a client document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Required,
    Requested,
    Uploaded,
    UnderReview,
    Approved,
    Rejected,
    Expired,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 7] = [
        Self::Required,
        Self::Requested,
        Self::Uploaded,
        Self::UnderReview,
        Self::Approved,
        Self::Rejected,
        Self::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Requested => "REQUESTED",
            Self::Uploaded => "UPLOADED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Category of a loan document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    Income,
    Assets,
    Credit,
    Identity,
    Property,
    Employment,
    Insurance,
    Other,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 8] = [
        Self::Income,
        Self::Assets,
        Self::Credit,
        Self::Identity,
        Self::Property,
        Self::Employment,
        Self::Insurance,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Assets => "ASSETS",
            Self::Credit => "CREDIT",
            Self::Identity => "IDENTITY",
            Self::Property => "PROPERTY",
            Self::Employment => "EMPLOYMENT",
            Self::Insurance => "INSURANCE",
            Self::Other => "OTHER",
        }
    }

    /// Capitalized form used when deriving a default document name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Assets => "Assets",
            Self::Credit => "Credit",
            Self::Identity => "Identity",
            Self::Property => "Property",
            Self::Employment => "Employment",
            Self::Insurance => "Insurance",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Complete,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Complete => "COMPLETE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::Todo, Self::InProgress, Self::Complete]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::Low, Self::Medium, Self::High, Self::Urgent]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

/// Staff role, used for role-based task/notification routing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    LoanOfficer,
    Processor,
    Underwriter,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        Self::LoanOfficer,
        Self::Processor,
        Self::Underwriter,
        Self::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoanOfficer => "LOAN_OFFICER",
            Self::Processor => "PROCESSOR",
            Self::Underwriter => "UNDERWRITER",
            Self::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Outbound communication channel. Also doubles as the communication
/// template type: a template is only usable on its own channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationChannel {
    Email,
    Sms,
    Letter,
}

impl CommunicationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
            Self::Letter => "LETTER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::Email, Self::Sms, Self::Letter]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationStatus {
    Draft,
    Sent,
    Failed,
}

impl CommunicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::Draft, Self::Sent, Self::Failed]
            .into_iter()
            .find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,  // Encrypted
    pub email: String, // Encrypted
    pub phone: Option<String>, // Encrypted
    pub status: ClientStatus,
    pub tags: Vec<String>,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub text: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub category: DocumentCategory,
    pub status: DocumentStatus,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub client_id: Uuid,
    pub user_id: Option<Uuid>,
    pub text: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Communication {
    pub id: Uuid,
    pub client_id: Uuid,
    pub channel: CommunicationChannel,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
    pub status: CommunicationStatus,
    pub template_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationTemplate {
    pub id: Uuid,
    pub name: String,
    pub channel: CommunicationChannel,
    pub subject: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteTemplate {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only audit record. Written by the workflow engine as part of
/// every action's contract, not as optional logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub activity_type: String,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_status_round_trip() {
        for status in ClientStatus::ALL {
            assert_eq!(ClientStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ClientStatus::parse("NOT_A_STATUS"), None);
    }

    #[test]
    fn test_client_status_serde_wire_format() {
        let json = serde_json::to_string(&ClientStatus::ClearToClose).unwrap();
        assert_eq!(json, "\"CLEAR_TO_CLOSE\"");

        let parsed: ClientStatus = serde_json::from_str("\"PRE_QUALIFIED\"").unwrap();
        assert_eq!(parsed, ClientStatus::PreQualified);
    }

    #[test]
    fn test_document_status_round_trip() {
        for status in DocumentStatus::ALL {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_document_category_display_names() {
        assert_eq!(DocumentCategory::Income.display_name(), "Income");
        assert_eq!(DocumentCategory::Other.display_name(), "Other");
        assert_eq!(DocumentCategory::parse("PROPERTY"), Some(DocumentCategory::Property));
    }

    #[test]
    fn test_valid_values_listing() {
        let values = ClientStatus::valid_values();
        assert!(values.starts_with("LEAD"));
        assert!(values.contains("CLEAR_TO_CLOSE"));
        assert!(values.ends_with("INACTIVE"));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::parse("PROCESSOR"), Some(UserRole::Processor));
        assert_eq!(UserRole::parse("processor"), None);
    }

    #[test]
    fn test_task_priority_default() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }
}
