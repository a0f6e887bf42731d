// PostgreSQL-backed store. Status and category columns are TEXT in
// their wire form; tags are TEXT[]. Client contact columns hold
// ciphertext and are decrypted by the executor layer, never here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use originate_shared::{
    Activity, Client, ClientStatus, Communication, CommunicationChannel, CommunicationTemplate,
    Document, DocumentCategory, DocumentStatus, Note, NoteTemplate, Notification, Task,
    TaskPriority, TaskStatus, User, UserRole,
};

use crate::error::{StoreError, StoreResult};

use super::{
    ActivityStore, ClientStore, CommunicationStore, DocumentStore, NoteStore, NotificationStore,
    TaskCompletion, TaskStore, TemplateStore, UserStore,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode<T, F>(label: &str, raw: &str, parse: F) -> StoreResult<T>
where
    F: FnOnce(&str) -> Option<T>,
{
    parse(raw).ok_or_else(|| StoreError::Decode(format!("unknown {} value '{}'", label, raw)))
}

type ClientRow = (
    Uuid,
    String,
    String,
    Option<String>,
    String,
    Vec<String>,
    Option<Uuid>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

fn map_client(row: ClientRow) -> StoreResult<Client> {
    Ok(Client {
        id: row.0,
        name: row.1,
        email: row.2,
        phone: row.3,
        status: decode("client status", &row.4, ClientStatus::parse)?,
        tags: row.5,
        assigned_to: row.6,
        created_at: row.7,
        updated_at: row.8,
    })
}

type TaskRow = (
    Uuid,
    Option<Uuid>,
    String,
    Option<String>,
    String,
    String,
    Option<DateTime<Utc>>,
    Option<Uuid>,
    Option<DateTime<Utc>>,
    Option<Uuid>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

const TASK_COLUMNS: &str =
    "id, client_id, text, description, priority, status, due_date, assigned_to, completed_at, created_by, created_at, updated_at";

fn map_task(row: TaskRow) -> StoreResult<Task> {
    Ok(Task {
        id: row.0,
        client_id: row.1,
        text: row.2,
        description: row.3,
        priority: decode("task priority", &row.4, TaskPriority::parse)?,
        status: decode("task status", &row.5, TaskStatus::parse)?,
        due_date: row.6,
        assigned_to: row.7,
        completed_at: row.8,
        created_by: row.9,
        created_at: row.10,
        updated_at: row.11,
    })
}

type DocumentRow = (
    Uuid,
    Uuid,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

const DOCUMENT_COLUMNS: &str =
    "id, client_id, name, category, status, file_name, file_path, file_size, due_date, created_at, updated_at";

fn map_document(row: DocumentRow) -> StoreResult<Document> {
    Ok(Document {
        id: row.0,
        client_id: row.1,
        name: row.2,
        category: decode("document category", &row.3, DocumentCategory::parse)?,
        status: decode("document status", &row.4, DocumentStatus::parse)?,
        file_name: row.5,
        file_path: row.6,
        file_size: row.7,
        due_date: row.8,
        created_at: row.9,
        updated_at: row.10,
    })
}

type UserRow = (Uuid, String, String, String, bool, DateTime<Utc>);

fn map_user(row: UserRow) -> StoreResult<User> {
    Ok(User {
        id: row.0,
        name: row.1,
        email: row.2,
        role: decode("user role", &row.3, UserRole::parse)?,
        is_active: row.4,
        created_at: row.5,
    })
}

#[async_trait]
impl ClientStore for PgStore {
    async fn find_client(&self, id: Uuid) -> StoreResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(
            "SELECT id, name, email, phone, status, tags, assigned_to, created_at, updated_at
             FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_client).transpose()
    }

    async fn update_client_status(&self, id: Uuid, status: ClientStatus) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE clients SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_client_tags(&self, id: Uuid, tags: &[String]) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE clients SET tags = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(tags)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_client_assignee(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE clients SET assigned_to = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, role, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_user).transpose()
    }

    async fn find_first_active_by_role(&self, role: UserRole) -> StoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, role, is_active, created_at
             FROM users WHERE role = $1 AND is_active = true
             ORDER BY created_at ASC LIMIT 1",
        )
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_user).transpose()
    }

    async fn find_active_by_role(&self, role: UserRole) -> StoreResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, name, email, role, is_active, created_at
             FROM users WHERE role = $1 AND is_active = true
             ORDER BY created_at ASC",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_user).collect()
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_task).transpose()
    }

    async fn create_task(&self, task: Task) -> StoreResult<Task> {
        sqlx::query(
            "INSERT INTO tasks (id, client_id, text, description, priority, status, due_date,
                                assigned_to, completed_at, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(task.id)
        .bind(task.client_id)
        .bind(&task.text)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.assigned_to)
        .bind(task.completed_at)
        .bind(task.created_by)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;

        Ok(task)
    }

    async fn complete_task_if_open(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> StoreResult<TaskCompletion> {
        // Single conditional update: the status check and the write
        // cannot interleave with a concurrent completion.
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "UPDATE tasks SET status = 'COMPLETE', completed_at = $2, updated_at = NOW()
             WHERE id = $1 AND status <> 'COMPLETE'
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(TaskCompletion::Completed(map_task(row)?));
        }

        match self.find_task(id).await? {
            Some(task) => Ok(TaskCompletion::AlreadyComplete(task)),
            None => Ok(TaskCompletion::NotFound),
        }
    }

    async fn assign_task(&self, id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE tasks SET assigned_to = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find_document(&self, id: Uuid) -> StoreResult<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM documents WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_document).transpose()
    }

    async fn find_documents_by_client(&self, client_id: Uuid) -> StoreResult<Vec<Document>> {
        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM documents WHERE client_id = $1 ORDER BY created_at ASC",
            DOCUMENT_COLUMNS
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_document).collect()
    }

    async fn create_document(&self, document: Document) -> StoreResult<Document> {
        sqlx::query(
            "INSERT INTO documents (id, client_id, name, category, status, file_name, file_path,
                                    file_size, due_date, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(document.id)
        .bind(document.client_id)
        .bind(&document.name)
        .bind(document.category.as_str())
        .bind(document.status.as_str())
        .bind(&document.file_name)
        .bind(&document.file_path)
        .bind(document.file_size)
        .bind(document.due_date)
        .bind(document.created_at)
        .execute(&self.pool)
        .await?;

        Ok(document)
    }

    async fn update_document_status(&self, id: Uuid, status: DocumentStatus) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE documents SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn create_note(&self, note: Note) -> StoreResult<Note> {
        sqlx::query(
            "INSERT INTO notes (id, client_id, user_id, text, tags, is_pinned, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(note.id)
        .bind(note.client_id)
        .bind(note.user_id)
        .bind(&note.text)
        .bind(&note.tags)
        .bind(note.is_pinned)
        .bind(note.created_at)
        .execute(&self.pool)
        .await?;

        Ok(note)
    }
}

#[async_trait]
impl CommunicationStore for PgStore {
    async fn create_communication(&self, communication: Communication) -> StoreResult<Communication> {
        sqlx::query(
            "INSERT INTO communications (id, client_id, channel, recipient, subject, body, status,
                                         template_id, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(communication.id)
        .bind(communication.client_id)
        .bind(communication.channel.as_str())
        .bind(&communication.recipient)
        .bind(&communication.subject)
        .bind(&communication.body)
        .bind(communication.status.as_str())
        .bind(communication.template_id)
        .bind(communication.created_by)
        .bind(communication.created_at)
        .execute(&self.pool)
        .await?;

        Ok(communication)
    }
}

#[async_trait]
impl TemplateStore for PgStore {
    async fn find_communication_template(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<CommunicationTemplate>> {
        let row: Option<(Uuid, String, String, Option<String>, String, DateTime<Utc>)> =
            sqlx::query_as(
                "SELECT id, name, channel, subject, body, created_at
                 FROM communication_templates WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| {
            Ok(CommunicationTemplate {
                id: r.0,
                name: r.1,
                channel: decode("communication channel", &r.2, CommunicationChannel::parse)?,
                subject: r.3,
                body: r.4,
                created_at: r.5,
            })
        })
        .transpose()
    }

    async fn find_note_template(&self, id: Uuid) -> StoreResult<Option<NoteTemplate>> {
        let row: Option<(Uuid, String, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, name, content, created_at FROM note_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| NoteTemplate {
            id: r.0,
            name: r.1,
            content: r.2,
            created_at: r.3,
        }))
    }
}

#[async_trait]
impl ActivityStore for PgStore {
    async fn create_activity(&self, activity: Activity) -> StoreResult<Activity> {
        sqlx::query(
            "INSERT INTO activities (id, client_id, user_id, activity_type, description, metadata, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(activity.id)
        .bind(activity.client_id)
        .bind(activity.user_id)
        .bind(&activity.activity_type)
        .bind(&activity.description)
        .bind(&activity.metadata)
        .bind(activity.created_at)
        .execute(&self.pool)
        .await?;

        Ok(activity)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create_notification(&self, notification: Notification) -> StoreResult<Notification> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, title, message, link, read, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.link)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(notification)
    }
}
