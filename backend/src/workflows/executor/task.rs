// Task executors: CREATE_TASK / COMPLETE_TASK / ASSIGN_TASK

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use originate_shared::{Task, TaskPriority, TaskStatus};

use crate::error::{EngineError, EngineResult};
use crate::store::TaskCompletion;
use crate::workflows::actions::TaskConfig;
use crate::workflows::context::{ActionResult, ExecutionContext};
use crate::workflows::templates::render;

use super::{activity_types, non_blank, parse_role, resolve_due_date, ActionExecutor};

impl ActionExecutor {
    pub(crate) async fn create_task(
        &self,
        config: &TaskConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let text = non_blank(config.text.clone())
            .ok_or_else(|| EngineError::Validation("Task text is required".to_string()))?;

        let priority = match &config.priority {
            Some(p) => TaskPriority::parse(p).ok_or_else(|| {
                EngineError::Validation(format!("Invalid task priority '{}'", p))
            })?,
            None => TaskPriority::default(),
        };

        let placeholder_ctx = self.placeholder_context(ctx).await?;
        let due_date = resolve_due_date(config.due_days, config.due_date);
        let assigned_to = self
            .resolve_assignee(config.assigned_to_id, config.assigned_to_role.as_deref(), ctx, false)
            .await?;

        let rendered_text = render(&text, &placeholder_ctx);
        let rendered_description = config
            .description
            .as_deref()
            .map(|d| render(d, &placeholder_ctx));

        let task = self
            .store()
            .create_task(Task {
                id: Uuid::new_v4(),
                client_id: Some(ctx.client_id),
                text: rendered_text.clone(),
                description: rendered_description,
                priority,
                status: TaskStatus::Todo,
                due_date,
                assigned_to: Some(assigned_to),
                completed_at: None,
                created_by: Some(ctx.user_id),
                created_at: Utc::now(),
                updated_at: None,
            })
            .await?;

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::TASK_CREATED,
            format!("Workflow created task '{}'", rendered_text),
            Some(json!({ "task_id": task.id, "assigned_to": assigned_to })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("Task '{}' created", rendered_text),
            json!({
                "task_id": task.id,
                "text": task.text,
                "due_date": task.due_date,
                "assigned_to": assigned_to,
                "priority": priority.as_str(),
            }),
        ))
    }

    pub(crate) async fn complete_task(
        &self,
        config: &TaskConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let task_id = config
            .task_id
            .ok_or_else(|| EngineError::Validation("taskId is required".to_string()))?;

        match self.store().complete_task_if_open(task_id, Utc::now()).await? {
            TaskCompletion::NotFound => {
                Err(EngineError::NotFound(format!("Task {} not found", task_id)))
            }
            // Re-running a completion is a safe no-op: same success
            // shape, no second completion timestamp, no new activity.
            TaskCompletion::AlreadyComplete(task) => Ok(ActionResult::ok_with(
                "Task already complete",
                json!({
                    "task_id": task.id,
                    "already_complete": true,
                    "completed_at": task.completed_at,
                }),
            )),
            TaskCompletion::Completed(task) => {
                if let Some(client_id) = task.client_id {
                    self.record_activity(
                        Some(client_id),
                        Some(ctx.user_id),
                        activity_types::TASK_COMPLETED,
                        format!("Workflow completed task '{}'", task.text),
                        Some(json!({ "task_id": task.id })),
                    )
                    .await;
                }

                Ok(ActionResult::ok_with(
                    "Task marked complete",
                    json!({
                        "task_id": task.id,
                        "completed_at": task.completed_at,
                    }),
                ))
            }
        }
    }

    pub(crate) async fn assign_task(
        &self,
        config: &TaskConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let task_id = config
            .task_id
            .ok_or_else(|| EngineError::Validation("taskId is required".to_string()))?;
        if config.assigned_to_id.is_none() && config.assigned_to_role.is_none() {
            return Err(EngineError::Validation(
                "assignedToId or assignedToRole is required".to_string(),
            ));
        }

        let task = self
            .store()
            .find_task(task_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Task {} not found", task_id)))?;

        let assignee = self
            .resolve_assignee(config.assigned_to_id, config.assigned_to_role.as_deref(), ctx, true)
            .await?;

        self.store().assign_task(task_id, assignee).await?;

        if let Some(client_id) = task.client_id {
            self.record_activity(
                Some(client_id),
                Some(ctx.user_id),
                activity_types::TASK_ASSIGNED,
                format!("Workflow assigned task '{}'", task.text),
                Some(json!({ "task_id": task.id, "assigned_to": assignee })),
            )
            .await;
        }

        Ok(ActionResult::ok_with(
            "Task assigned",
            json!({ "task_id": task.id, "assigned_to": assignee }),
        ))
    }

    /// Assignee resolution: explicit user id, else first active user
    /// with the role, else the user whose event triggered the
    /// workflow. `role_must_match` makes an unmatched role a failure
    /// instead of falling through.
    pub(crate) async fn resolve_assignee(
        &self,
        explicit: Option<Uuid>,
        role: Option<&str>,
        ctx: &ExecutionContext,
        role_must_match: bool,
    ) -> EngineResult<Uuid> {
        if let Some(user_id) = explicit {
            if self.store().find_user(user_id).await?.is_none() {
                return Err(EngineError::NotFound(format!("User {} not found", user_id)));
            }
            return Ok(user_id);
        }

        if let Some(role_str) = role {
            let role = parse_role(role_str)?;
            match self.store().find_first_active_by_role(role).await? {
                Some(user) => return Ok(user.id),
                None if role_must_match => {
                    return Err(EngineError::NotFound(format!(
                        "No active user with role {}",
                        role.as_str()
                    )));
                }
                None => {}
            }
        }

        Ok(ctx.user_id)
    }
}
