// Common test utilities shared across integration tests

use std::sync::Once;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use originate_backend::config::{Environment, WebhookDefaults};
use originate_backend::services::EncryptionService;
use originate_backend::store::MemoryStore;
use originate_backend::workflows::{ActionExecutor, ExecutionContext, TriggerType};
use originate_shared::{
    Client, ClientStatus, CommunicationChannel, CommunicationTemplate, Document,
    DocumentCategory, DocumentStatus, NoteTemplate, Task, TaskPriority, TaskStatus, User,
    UserRole,
};

pub const TEST_KEY: &str = "test_key_32_bytes_long_exactly!!";

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

/// A memory-backed executor with one seeded client ("Jane Doe") and
/// the user whose event triggered the workflow.
pub struct TestHarness {
    pub store: std::sync::Arc<MemoryStore>,
    pub executor: ActionExecutor,
    pub encryption: EncryptionService,
    pub client_id: Uuid,
    pub user_id: Uuid,
}

pub async fn harness() -> TestHarness {
    init_test_logging();

    let store = std::sync::Arc::new(MemoryStore::new());
    let encryption = EncryptionService::new(TEST_KEY).unwrap();

    let client_id = Uuid::new_v4();
    store
        .insert_client(Client {
            id: client_id,
            name: encryption.encrypt("Jane Doe").unwrap(),
            email: encryption.encrypt("jane.doe@example.com").unwrap(),
            phone: Some(encryption.encrypt("555-0100").unwrap()),
            status: ClientStatus::Processing,
            tags: vec!["refi".to_string()],
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: None,
        })
        .await;

    let user_id = Uuid::new_v4();
    store
        .insert_user(User {
            id: user_id,
            name: "Alex Officer".to_string(),
            email: "alex@originate.test".to_string(),
            role: UserRole::LoanOfficer,
            is_active: true,
            created_at: Utc::now(),
        })
        .await;

    let executor = ActionExecutor::new(
        store.clone(),
        encryption.clone(),
        None,
        Environment::Development,
        "https://app.originate.test".to_string(),
        WebhookDefaults::default(),
    );

    TestHarness {
        store,
        executor,
        encryption,
        client_id,
        user_id,
    }
}

impl TestHarness {
    pub fn ctx(&self) -> ExecutionContext {
        ExecutionContext::new(
            self.client_id,
            TriggerType::Manual,
            json!({}),
            self.user_id,
        )
    }

    pub async fn seed_user(&self, name: &str, role: UserRole, is_active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .insert_user(User {
                id,
                name: name.to_string(),
                email: format!("{}@originate.test", name.to_lowercase().replace(' ', ".")),
                role,
                is_active,
                created_at: Utc::now(),
            })
            .await;
        id
    }

    pub async fn seed_task(&self, text: &str, status: TaskStatus) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .insert_task(Task {
                id,
                client_id: Some(self.client_id),
                text: text.to_string(),
                description: None,
                priority: TaskPriority::default(),
                status,
                due_date: None,
                assigned_to: None,
                completed_at: if status == TaskStatus::Complete {
                    Some(Utc::now())
                } else {
                    None
                },
                created_by: None,
                created_at: Utc::now(),
                updated_at: None,
            })
            .await;
        id
    }

    pub async fn seed_document(
        &self,
        client_id: Uuid,
        name: &str,
        status: DocumentStatus,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .insert_document(Document {
                id,
                client_id,
                name: name.to_string(),
                category: DocumentCategory::Income,
                status,
                file_name: None,
                file_path: None,
                file_size: None,
                due_date: None,
                created_at: Utc::now(),
                updated_at: None,
            })
            .await;
        id
    }

    pub async fn seed_communication_template(
        &self,
        channel: CommunicationChannel,
        subject: Option<&str>,
        body: &str,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .insert_communication_template(CommunicationTemplate {
                id,
                name: format!("{} template", channel.as_str()),
                channel,
                subject: subject.map(str::to_string),
                body: body.to_string(),
                created_at: Utc::now(),
            })
            .await;
        id
    }

    pub async fn seed_note_template(&self, content: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .insert_note_template(NoteTemplate {
                id,
                name: "Milestone note".to_string(),
                content: content.to_string(),
                created_at: Utc::now(),
            })
            .await;
        id
    }

    pub async fn activity_types(&self) -> Vec<String> {
        self.store
            .activities()
            .await
            .into_iter()
            .map(|a| a.activity_type)
            .collect()
    }
}
