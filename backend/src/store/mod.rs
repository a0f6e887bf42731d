// Data store interface - injected repository traits per entity
//
// The engine never talks to a database driver directly; executors go
// through these traits so the persistence backend can be swapped
// (Postgres in deployment, in-memory for tests and local development).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use originate_shared::{
    Activity, Client, ClientStatus, Communication, CommunicationTemplate, Document,
    DocumentStatus, Note, NoteTemplate, Notification, Task, User, UserRole,
};

use crate::error::StoreResult;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Outcome of the conditional task-completion update. The status check
/// and the write happen in a single store operation so two concurrent
/// completions cannot both observe an open task.
#[derive(Debug, Clone)]
pub enum TaskCompletion {
    /// The task was open and is now complete.
    Completed(Task),
    /// The task was already complete; nothing was written.
    AlreadyComplete(Task),
    NotFound,
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn find_client(&self, id: Uuid) -> StoreResult<Option<Client>>;
    async fn update_client_status(&self, id: Uuid, status: ClientStatus) -> StoreResult<bool>;
    async fn update_client_tags(&self, id: Uuid, tags: &[String]) -> StoreResult<bool>;
    async fn update_client_assignee(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    /// First active user with the given role, or `None`.
    async fn find_first_active_by_role(&self, role: UserRole) -> StoreResult<Option<User>>;
    /// Every active user with the given role.
    async fn find_active_by_role(&self, role: UserRole) -> StoreResult<Vec<User>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;
    async fn create_task(&self, task: Task) -> StoreResult<Task>;
    /// Atomically mark an open task complete. See [`TaskCompletion`].
    async fn complete_task_if_open(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<TaskCompletion>;
    /// Reassign a task. Returns `false` when the task does not exist.
    async fn assign_task(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_document(&self, id: Uuid) -> StoreResult<Option<Document>>;
    async fn find_documents_by_client(&self, client_id: Uuid) -> StoreResult<Vec<Document>>;
    async fn create_document(&self, document: Document) -> StoreResult<Document>;
    /// Returns `false` when the document does not exist.
    async fn update_document_status(&self, id: Uuid, status: DocumentStatus) -> StoreResult<bool>;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create_note(&self, note: Note) -> StoreResult<Note>;
}

#[async_trait]
pub trait CommunicationStore: Send + Sync {
    async fn create_communication(&self, communication: Communication) -> StoreResult<Communication>;
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn find_communication_template(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<CommunicationTemplate>>;
    async fn find_note_template(&self, id: Uuid) -> StoreResult<Option<NoteTemplate>>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn create_activity(&self, activity: Activity) -> StoreResult<Activity>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(&self, notification: Notification) -> StoreResult<Notification>;
}

/// The full set of repositories the action executor needs, as one
/// injectable object.
pub trait DataStore:
    ClientStore
    + UserStore
    + TaskStore
    + DocumentStore
    + NoteStore
    + CommunicationStore
    + TemplateStore
    + ActivityStore
    + NotificationStore
{
}

impl<T> DataStore for T where
    T: ClientStore
        + UserStore
        + TaskStore
        + DocumentStore
        + NoteStore
        + CommunicationStore
        + TemplateStore
        + ActivityStore
        + NotificationStore
{
}
