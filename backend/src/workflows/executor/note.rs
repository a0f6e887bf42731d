// Note executor: CREATE_NOTE

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use originate_shared::Note;

use crate::error::{EngineError, EngineResult};
use crate::workflows::actions::NoteConfig;
use crate::workflows::context::{ActionResult, ExecutionContext};
use crate::workflows::templates::render;

use super::{activity_types, non_blank, ActionExecutor};

impl ActionExecutor {
    pub(crate) async fn create_note(
        &self,
        config: &NoteConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let placeholder_ctx = self.placeholder_context(ctx).await?;

        // Template content wins over config text; a template with
        // blank content falls back to the config's own text.
        let mut text = non_blank(config.text.clone());
        let mut template_name: Option<String> = None;
        if let Some(template_id) = config.template_id {
            let template = self
                .store()
                .find_note_template(template_id)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("Note template {} not found", template_id))
                })?;

            if let Some(content) = non_blank(Some(template.content.clone())) {
                text = Some(content);
            }
            template_name = Some(template.name);
        }

        let text = text.ok_or_else(|| {
            EngineError::Validation(
                "Note text is required; set text or reference a template with content".to_string(),
            )
        })?;
        let rendered_text = render(&text, &placeholder_ctx);

        let note = self
            .store()
            .create_note(Note {
                id: Uuid::new_v4(),
                client_id: ctx.client_id,
                user_id: Some(ctx.user_id),
                text: rendered_text,
                tags: config.tags.clone().unwrap_or_default(),
                is_pinned: config.is_pinned.unwrap_or(false),
                created_at: Utc::now(),
            })
            .await?;

        let description = match &template_name {
            Some(name) => format!("Workflow created note from template '{}'", name),
            None => "Workflow created note".to_string(),
        };
        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::NOTE_CREATED,
            description,
            Some(json!({ "note_id": note.id, "template_id": config.template_id })),
        )
        .await;

        Ok(ActionResult::ok_with(
            "Note created",
            json!({ "note_id": note.id, "is_pinned": note.is_pinned }),
        ))
    }
}
