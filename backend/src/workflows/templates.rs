// Placeholder substitution for action text fields
//
// Every text an action emits (communication bodies, task text, note
// text, webhook headers/bodies, document-request messages) runs
// through this before it is persisted or sent.

use chrono::Utc;

use super::context::PlaceholderContext;

/// Replace every occurrence of the supported `{{placeholder}}` tokens
/// with values from the context. A token whose value is absent (e.g. a
/// client without a phone number) renders as the empty string; tokens
/// outside the supported set are left verbatim. Pure - no side effects.
pub fn render(template: &str, ctx: &PlaceholderContext) -> String {
    let now = Utc::now();

    let substitutions = [
        ("{{date}}", now.format("%Y-%m-%d").to_string()),
        ("{{time}}", now.format("%H:%M").to_string()),
        ("{{trigger_type}}", ctx.trigger_type.as_str().to_string()),
        ("{{client_name}}", ctx.client.name.clone()),
        ("{{client_email}}", ctx.client.email.clone()),
        ("{{client_phone}}", ctx.client.phone.clone().unwrap_or_default()),
        ("{{client_status}}", ctx.client.status.as_str().to_string()),
    ];

    let mut rendered = template.to_string();
    for (token, value) in substitutions {
        rendered = rendered.replace(token, &value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::context::ClientSnapshot;
    use crate::workflows::triggers::TriggerType;
    use originate_shared::ClientStatus;
    use uuid::Uuid;

    fn context() -> PlaceholderContext {
        PlaceholderContext::new(
            ClientSnapshot {
                id: Uuid::new_v4(),
                name: "Jane Doe".to_string(),
                email: "jane.doe@example.com".to_string(),
                phone: Some("555-0100".to_string()),
                status: ClientStatus::Processing,
                tags: vec!["refi".to_string()],
            },
            TriggerType::ClientStatusChanged,
        )
    }

    #[test]
    fn test_substitutes_client_fields() {
        let rendered = render("Call {{client_name}} at {{client_phone}}", &context());
        assert_eq!(rendered, "Call Jane Doe at 555-0100");
    }

    #[test]
    fn test_substitutes_all_occurrences() {
        let rendered = render("{{client_name}} / {{client_name}}", &context());
        assert_eq!(rendered, "Jane Doe / Jane Doe");
    }

    #[test]
    fn test_no_tokens_is_identity() {
        let template = "No placeholders here, just { braces } and text.";
        assert_eq!(render(template, &context()), template);
    }

    #[test]
    fn test_missing_value_renders_empty() {
        let mut ctx = context();
        ctx.client.phone = None;
        assert_eq!(render("Phone: {{client_phone}}.", &ctx), "Phone: .");

        ctx.client.name = String::new();
        assert_eq!(render("Hi {{client_name}}!", &ctx), "Hi !");
    }

    #[test]
    fn test_unknown_tokens_left_verbatim() {
        let rendered = render("{{loan_amount}} for {{client_name}}", &context());
        assert_eq!(rendered, "{{loan_amount}} for Jane Doe");
    }

    #[test]
    fn test_trigger_and_status_tokens() {
        let rendered = render("{{trigger_type}}:{{client_status}}", &context());
        assert_eq!(rendered, "CLIENT_STATUS_CHANGED:PROCESSING");
    }

    #[test]
    fn test_date_token_shape() {
        let rendered = render("{{date}}", &context());
        assert_eq!(rendered.len(), 10);
        assert_eq!(&rendered[4..5], "-");
    }
}
