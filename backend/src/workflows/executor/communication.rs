// Communication executors: SEND_EMAIL / SEND_SMS / GENERATE_LETTER
//
// Delivery itself is owned by downstream systems; these actions record
// the rendered communication as SENT and leave the audit entry.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use originate_shared::{Communication, CommunicationChannel, CommunicationStatus};

use crate::error::{EngineError, EngineResult};
use crate::workflows::actions::{CommunicationActionType, CommunicationConfig};
use crate::workflows::context::{ActionResult, ExecutionContext};
use crate::workflows::templates::render;

use super::{activity_types, non_blank, ActionExecutor};

impl ActionExecutor {
    pub(crate) async fn execute_communication(
        &self,
        action: CommunicationActionType,
        config: &CommunicationConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let channel = match action {
            CommunicationActionType::SendEmail => CommunicationChannel::Email,
            CommunicationActionType::SendSms => CommunicationChannel::Sms,
            CommunicationActionType::GenerateLetter => CommunicationChannel::Letter,
        };

        let placeholder_ctx = self.placeholder_context(ctx).await?;

        // A template supplies subject/body for the fields it defines;
        // blank template fields fall back to the config's own values.
        let mut subject = non_blank(config.subject.clone());
        let mut body = non_blank(config.body.clone());
        if let Some(template_id) = config.template_id {
            let template = self
                .store()
                .find_communication_template(template_id)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("Communication template {} not found", template_id))
                })?;

            if template.channel != channel {
                return Err(EngineError::Validation(format!(
                    "Template type mismatch: {} requires an {} template, but '{}' is {}",
                    action.as_str(),
                    channel.as_str(),
                    template.name,
                    template.channel.as_str()
                )));
            }

            if let Some(template_subject) = non_blank(template.subject.clone()) {
                subject = Some(template_subject);
            }
            if let Some(template_body) = non_blank(Some(template.body.clone())) {
                body = Some(template_body);
            }
        }

        let body = body.ok_or_else(|| {
            EngineError::Validation(
                "Communication body is required; set body or reference a template that defines one"
                    .to_string(),
            )
        })?;

        let rendered_body = render(&body, &placeholder_ctx);
        let rendered_subject = subject.map(|s| render(&s, &placeholder_ctx));

        let recipient = match non_blank(config.to.clone()) {
            Some(to) => to,
            None => match channel {
                CommunicationChannel::Email | CommunicationChannel::Letter => {
                    placeholder_ctx.client.email.clone()
                }
                CommunicationChannel::Sms => {
                    placeholder_ctx.client.phone.clone().ok_or_else(|| {
                        EngineError::Validation(
                            "Client has no phone number on file".to_string(),
                        )
                    })?
                }
            },
        };
        if recipient.trim().is_empty() {
            return Err(EngineError::Validation(
                "No recipient could be resolved".to_string(),
            ));
        }

        let communication = self
            .store()
            .create_communication(Communication {
                id: Uuid::new_v4(),
                client_id: ctx.client_id,
                channel,
                recipient: recipient.clone(),
                subject: rendered_subject.clone(),
                body: rendered_body.clone(),
                status: CommunicationStatus::Sent,
                template_id: config.template_id,
                created_by: Some(ctx.user_id),
                created_at: Utc::now(),
            })
            .await?;

        let channel_word = match channel {
            CommunicationChannel::Email => "email",
            CommunicationChannel::Sms => "SMS",
            CommunicationChannel::Letter => "letter",
        };

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::COMMUNICATION_SENT,
            format!("Workflow sent {} to {}", channel_word, recipient),
            Some(json!({
                "communication_id": communication.id,
                "channel": channel.as_str(),
                "template_id": config.template_id,
            })),
        )
        .await;

        Ok(ActionResult::ok_with(
            format!("{} to {} recorded as sent", capitalize(channel_word), recipient),
            json!({
                "communication_id": communication.id,
                "channel": channel.as_str(),
                "recipient": recipient,
                "subject": rendered_subject,
                "body": rendered_body,
            }),
        ))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
