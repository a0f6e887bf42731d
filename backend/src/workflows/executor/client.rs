// Client executors: UPDATE_CLIENT_STATUS / ADD_TAG / REMOVE_TAG / ASSIGN_CLIENT

use std::collections::BTreeSet;

use serde_json::json;

use originate_shared::ClientStatus;

use crate::error::{EngineError, EngineResult};
use crate::workflows::actions::ClientConfig;
use crate::workflows::context::{ActionResult, ExecutionContext};

use super::{activity_types, ActionExecutor};

impl ActionExecutor {
    pub(crate) async fn update_client_status(
        &self,
        config: &ClientConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let status_str = config
            .status
            .as_deref()
            .ok_or_else(|| EngineError::Validation("status is required".to_string()))?;
        let to_status = ClientStatus::parse(status_str).ok_or_else(|| {
            EngineError::Validation(format!(
                "Invalid client status '{}'. Valid options: {}",
                status_str,
                ClientStatus::valid_values()
            ))
        })?;

        let client = self
            .store()
            .find_client(ctx.client_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Client not found".to_string()))?;
        let from_status = client.status;

        self.store()
            .update_client_status(ctx.client_id, to_status)
            .await?;

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::CLIENT_STATUS_CHANGED,
            format!(
                "Workflow changed client status from {} to {}",
                from_status.as_str(),
                to_status.as_str()
            ),
            Some(json!({
                "from_status": from_status.as_str(),
                "to_status": to_status.as_str(),
            })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("Client status updated to {}", to_status.as_str()),
            json!({
                "from_status": from_status.as_str(),
                "to_status": to_status.as_str(),
            }),
        ))
    }

    pub(crate) async fn add_tags(
        &self,
        config: &ClientConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let tags = non_empty_tags(config.add_tags.as_deref(), "addTags")?;

        let client = self
            .store()
            .find_client(ctx.client_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Client not found".to_string()))?;

        // Set union; duplicates collapse, ordering is not part of the
        // contract.
        let mut tag_set: BTreeSet<String> = client.tags.into_iter().collect();
        for tag in &tags {
            tag_set.insert(tag.clone());
        }
        let new_tags: Vec<String> = tag_set.into_iter().collect();

        self.store()
            .update_client_tags(ctx.client_id, &new_tags)
            .await?;

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::CLIENT_TAGS_UPDATED,
            format!("Workflow added tag(s): {}", tags.join(", ")),
            Some(json!({ "added": tags, "tags": new_tags })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("Added {} tag(s)", tags.len()),
            json!({ "tags": new_tags }),
        ))
    }

    pub(crate) async fn remove_tags(
        &self,
        config: &ClientConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let tags = non_empty_tags(config.remove_tags.as_deref(), "removeTags")?;

        let client = self
            .store()
            .find_client(ctx.client_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Client not found".to_string()))?;

        // Set difference by exact string match.
        let new_tags: Vec<String> = client
            .tags
            .into_iter()
            .filter(|t| !tags.contains(t))
            .collect();

        self.store()
            .update_client_tags(ctx.client_id, &new_tags)
            .await?;

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::CLIENT_TAGS_UPDATED,
            format!("Workflow removed tag(s): {}", tags.join(", ")),
            Some(json!({ "removed": tags, "tags": new_tags })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("Removed {} tag(s)", tags.len()),
            json!({ "tags": new_tags }),
        ))
    }

    pub(crate) async fn assign_client(
        &self,
        config: &ClientConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let user_id = config
            .assigned_to_id
            .ok_or_else(|| EngineError::Validation("assignedToId is required".to_string()))?;

        let user = self
            .store()
            .find_user(user_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("User {} not found", user_id)))?;

        let client = self
            .store()
            .find_client(ctx.client_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Client not found".to_string()))?;
        let previous_owner = client.assigned_to;

        self.store()
            .update_client_assignee(ctx.client_id, user_id)
            .await?;

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::CLIENT_ASSIGNED,
            format!("Workflow assigned client to {}", user.name),
            Some(json!({
                "from_user": previous_owner,
                "to_user": user_id,
            })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("Client assigned to {}", user.name),
            json!({
                "from_user": previous_owner,
                "to_user": user_id,
            }),
        ))
    }
}

fn non_empty_tags(tags: Option<&[String]>, field: &str) -> EngineResult<Vec<String>> {
    let tags: Vec<String> = tags
        .unwrap_or_default()
        .iter()
        .filter(|t| !t.trim().is_empty())
        .cloned()
        .collect();

    if tags.is_empty() {
        return Err(EngineError::Validation(format!(
            "{} must contain at least one tag",
            field
        )));
    }
    Ok(tags)
}
