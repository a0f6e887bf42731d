// In-memory store over RwLock'd maps. Backs the test suite and local
// development; mirrors the Postgres semantics, including the atomic
// conditional task completion.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use originate_shared::{
    Activity, Client, ClientStatus, Communication, CommunicationTemplate, Document,
    DocumentStatus, Note, NoteTemplate, Notification, Task, TaskStatus, User, UserRole,
};

use crate::error::StoreResult;

use super::{
    ActivityStore, ClientStore, CommunicationStore, DocumentStore, NoteStore, NotificationStore,
    TaskCompletion, TaskStore, TemplateStore, UserStore,
};

#[derive(Default)]
struct MemoryInner {
    clients: HashMap<Uuid, Client>,
    users: Vec<User>,
    tasks: HashMap<Uuid, Task>,
    documents: HashMap<Uuid, Document>,
    notes: Vec<Note>,
    communications: Vec<Communication>,
    communication_templates: HashMap<Uuid, CommunicationTemplate>,
    note_templates: HashMap<Uuid, NoteTemplate>,
    activities: Vec<Activity>,
    notifications: Vec<Notification>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- seeding -----

    pub async fn insert_client(&self, client: Client) {
        self.inner.write().await.clients.insert(client.id, client);
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.push(user);
    }

    pub async fn insert_task(&self, task: Task) {
        self.inner.write().await.tasks.insert(task.id, task);
    }

    pub async fn insert_document(&self, document: Document) {
        self.inner.write().await.documents.insert(document.id, document);
    }

    pub async fn insert_communication_template(&self, template: CommunicationTemplate) {
        self.inner
            .write()
            .await
            .communication_templates
            .insert(template.id, template);
    }

    pub async fn insert_note_template(&self, template: NoteTemplate) {
        self.inner
            .write()
            .await
            .note_templates
            .insert(template.id, template);
    }

    // ----- inspection (test assertions) -----

    pub async fn get_client(&self, id: Uuid) -> Option<Client> {
        self.inner.read().await.clients.get(&id).cloned()
    }

    pub async fn get_task(&self, id: Uuid) -> Option<Task> {
        self.inner.read().await.tasks.get(&id).cloned()
    }

    pub async fn get_document(&self, id: Uuid) -> Option<Document> {
        self.inner.read().await.documents.get(&id).cloned()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.read().await.tasks.values().cloned().collect()
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.inner.read().await.notes.clone()
    }

    pub async fn communications(&self) -> Vec<Communication> {
        self.inner.read().await.communications.clone()
    }

    pub async fn activities(&self) -> Vec<Activity> {
        self.inner.read().await.activities.clone()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.read().await.notifications.clone()
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn find_client(&self, id: Uuid) -> StoreResult<Option<Client>> {
        Ok(self.inner.read().await.clients.get(&id).cloned())
    }

    async fn update_client_status(&self, id: Uuid, status: ClientStatus) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.clients.get_mut(&id) {
            Some(client) => {
                client.status = status;
                client.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_client_tags(&self, id: Uuid, tags: &[String]) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.clients.get_mut(&id) {
            Some(client) => {
                client.tags = tags.to_vec();
                client.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_client_assignee(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.clients.get_mut(&id) {
            Some(client) => {
                client.assigned_to = Some(user_id);
                client.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_first_active_by_role(&self, role: UserRole) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.role == role && u.is_active)
            .cloned())
    }

    async fn find_active_by_role(&self, role: UserRole) -> StoreResult<Vec<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .iter()
            .filter(|u| u.role == role && u.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn create_task(&self, task: Task) -> StoreResult<Task> {
        self.inner.write().await.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn complete_task_if_open(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<TaskCompletion> {
        // The write lock spans the check and the update, so this has
        // the same no-interleaving guarantee as the SQL version.
        let mut inner = self.inner.write().await;
        match inner.tasks.get_mut(&id) {
            Some(task) if task.status == TaskStatus::Complete => {
                Ok(TaskCompletion::AlreadyComplete(task.clone()))
            }
            Some(task) => {
                task.status = TaskStatus::Complete;
                task.completed_at = Some(completed_at);
                task.updated_at = Some(Utc::now());
                Ok(TaskCompletion::Completed(task.clone()))
            }
            None => Ok(TaskCompletion::NotFound),
        }
    }

    async fn assign_task(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.tasks.get_mut(&id) {
            Some(task) => {
                task.assigned_to = Some(user_id);
                task.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_document(&self, id: Uuid) -> StoreResult<Option<Document>> {
        Ok(self.inner.read().await.documents.get(&id).cloned())
    }

    async fn find_documents_by_client(&self, client_id: Uuid) -> StoreResult<Vec<Document>> {
        let mut documents: Vec<Document> = self
            .inner
            .read()
            .await
            .documents
            .values()
            .filter(|d| d.client_id == client_id)
            .cloned()
            .collect();
        documents.sort_by_key(|d| d.created_at);
        Ok(documents)
    }

    async fn create_document(&self, document: Document) -> StoreResult<Document> {
        self.inner
            .write()
            .await
            .documents
            .insert(document.id, document.clone());
        Ok(document)
    }

    async fn update_document_status(&self, id: Uuid, status: DocumentStatus) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.documents.get_mut(&id) {
            Some(document) => {
                document.status = status;
                document.updated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn create_note(&self, note: Note) -> StoreResult<Note> {
        self.inner.write().await.notes.push(note.clone());
        Ok(note)
    }
}

#[async_trait]
impl CommunicationStore for MemoryStore {
    async fn create_communication(&self, communication: Communication) -> StoreResult<Communication> {
        self.inner
            .write()
            .await
            .communications
            .push(communication.clone());
        Ok(communication)
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn find_communication_template(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<CommunicationTemplate>> {
        Ok(self
            .inner
            .read()
            .await
            .communication_templates
            .get(&id)
            .cloned())
    }

    async fn find_note_template(&self, id: Uuid) -> StoreResult<Option<NoteTemplate>> {
        Ok(self.inner.read().await.note_templates.get(&id).cloned())
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn create_activity(&self, activity: Activity) -> StoreResult<Activity> {
        self.inner.write().await.activities.push(activity.clone());
        Ok(activity)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, notification: Notification) -> StoreResult<Notification> {
        self.inner
            .write()
            .await
            .notifications
            .push(notification.clone());
        Ok(notification)
    }
}
