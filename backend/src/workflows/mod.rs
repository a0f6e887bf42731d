// Workflow Automation Engine
//
// Event-driven automation for the Originate loan-origination CRM.
// Triggers and conditions describe when a workflow fires; the action
// executor performs the typed side effects against the CRM data store.

pub mod actions;
pub mod conditions;
pub mod context;
pub mod executor;
pub mod templates;
pub mod triggers;

pub use actions::{
    ActivityConfig, ClientActionType, ClientConfig, CommunicationActionType, CommunicationConfig,
    DocumentActionType, DocumentConfig, NoteActionType, NoteConfig, NotificationActionType,
    NotificationConfig, TaskActionType, TaskConfig, WebhookActionType, WebhookConfig,
};
pub use conditions::{Condition, ConditionGroup, ConditionLogic, ConditionOperator};
pub use context::{ActionResult, ClientSnapshot, ExecutionContext, PlaceholderContext};
pub use executor::ActionExecutor;
pub use templates::render;
pub use triggers::{TriggerEvent, TriggerType};
