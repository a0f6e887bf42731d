// Webhook executor: CALL_WEBHOOK
//
// Attempt loop: 2xx is terminal success; 429 and 5xx (and transport
// errors) are retryable up to the retry bound with a constant delay;
// any other 4xx is terminal regardless of the retry setting. The URL
// and body are validated before the first attempt, so a malformed
// config consumes no network attempts.

use std::time::Duration;

use serde_json::json;
use tracing::warn;
use url::Url;

use crate::error::{EngineError, EngineResult};
use crate::workflows::actions::WebhookConfig;
use crate::workflows::context::{ActionResult, ExecutionContext, PlaceholderContext};
use crate::workflows::templates::render;

use super::{activity_types, ActionExecutor};

const USER_AGENT: &str = "Originate-Workflow/1.0";

enum AttemptOutcome {
    Success {
        status: u16,
        body: String,
    },
    Retryable {
        reason: String,
        status: Option<u16>,
        body: Option<String>,
    },
    Terminal {
        reason: String,
        status: Option<u16>,
        body: Option<String>,
    },
}

impl ActionExecutor {
    pub(crate) async fn call_webhook(
        &self,
        config: &WebhookConfig,
        ctx: &ExecutionContext,
    ) -> EngineResult<ActionResult> {
        let url = Url::parse(&config.url).map_err(|e| {
            EngineError::Validation(format!("Invalid webhook URL '{}': {}", config.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EngineError::Validation(format!(
                "Invalid webhook URL '{}': unsupported scheme '{}'",
                config.url,
                url.scheme()
            )));
        }

        let method = parse_method(config.method.as_deref().unwrap_or("POST"))?;

        let placeholder_ctx = self.placeholder_context(ctx).await?;
        let headers = build_headers(config, &placeholder_ctx);
        let body = build_body(config, &placeholder_ctx)?;

        let defaults = self.webhook_defaults();
        let timeout = Duration::from_secs(config.timeout_seconds.unwrap_or(defaults.timeout_seconds));
        let delay = Duration::from_secs(
            config
                .retry_delay_seconds
                .unwrap_or(defaults.retry_delay_seconds),
        );
        let retry_enabled = config.retry_on_failure.unwrap_or(true);
        let max_retries = config.max_retries.unwrap_or(defaults.max_retries);
        let max_attempts = if retry_enabled {
            max_retries.saturating_add(1)
        } else {
            1
        };
        let truncate_at = defaults.response_truncate_chars;

        let mut attempts = 0u32;
        let (reason, last_status, last_body) = loop {
            attempts += 1;
            let outcome = self
                .webhook_attempt(&method, &url, &headers, body.as_ref(), timeout, truncate_at)
                .await;

            match outcome {
                AttemptOutcome::Success { status, body } => {
                    self.record_activity(
                        Some(ctx.client_id),
                        Some(ctx.user_id),
                        activity_types::WEBHOOK_CALLED,
                        format!("Webhook call to {} returned {}", url, status),
                        Some(json!({
                            "url": url.as_str(),
                            "status_code": status,
                            "attempts": attempts,
                        })),
                    )
                    .await;

                    return Ok(ActionResult::ok_with(
                        format!("Webhook returned {}", status),
                        json!({
                            "status_code": status,
                            "attempts": attempts,
                            "response": body,
                        }),
                    ));
                }
                AttemptOutcome::Retryable {
                    reason,
                    status,
                    body,
                } => {
                    if attempts < max_attempts {
                        warn!(
                            "Webhook attempt {}/{} failed ({}), retrying in {}s",
                            attempts,
                            max_attempts,
                            reason,
                            delay.as_secs()
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    break (reason, status, body);
                }
                AttemptOutcome::Terminal {
                    reason,
                    status,
                    body,
                } => break (reason, status, body),
            }
        };

        self.record_activity(
            Some(ctx.client_id),
            Some(ctx.user_id),
            activity_types::WEBHOOK_FAILED,
            format!(
                "Webhook call to {} failed after {} attempt(s): {}",
                url, attempts, reason
            ),
            Some(json!({
                "url": url.as_str(),
                "attempts": attempts,
                "status_code": last_status,
            })),
        )
        .await;

        let mut data = json!({ "attempts": attempts });
        if let Some(status) = last_status {
            data["status_code"] = json!(status);
        }
        if let Some(body) = last_body {
            data["response"] = json!(body);
        }

        Ok(ActionResult::fail_with(
            format!("Webhook call failed after {} attempt(s): {}", attempts, reason),
            data,
        ))
    }

    async fn webhook_attempt(
        &self,
        method: &reqwest::Method,
        url: &Url,
        headers: &[(String, String)],
        body: Option<&serde_json::Value>,
        timeout: Duration,
        truncate_at: usize,
    ) -> AttemptOutcome {
        let mut request = self
            .http()
            .request(method.clone(), url.clone())
            .timeout(timeout);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let body = truncate_chars(&response.text().await.unwrap_or_default(), truncate_at);

                if status.is_success() {
                    AttemptOutcome::Success {
                        status: status.as_u16(),
                        body,
                    }
                } else if status.as_u16() == 429 || status.is_server_error() {
                    AttemptOutcome::Retryable {
                        reason: format!("HTTP {}", status.as_u16()),
                        status: Some(status.as_u16()),
                        body: Some(body),
                    }
                } else {
                    // 4xx other than 429 will not succeed on retry.
                    AttemptOutcome::Terminal {
                        reason: format!("HTTP {}", status.as_u16()),
                        status: Some(status.as_u16()),
                        body: Some(body),
                    }
                }
            }
            // Transport failures (timeouts, refused connections) are
            // indistinguishable from transient server trouble.
            Err(e) if e.is_timeout() => AttemptOutcome::Retryable {
                reason: format!("request timed out after {}s", timeout.as_secs()),
                status: None,
                body: None,
            },
            Err(e) => AttemptOutcome::Retryable {
                reason: format!("request error: {}", e),
                status: None,
                body: None,
            },
        }
    }
}

fn parse_method(method: &str) -> EngineResult<reqwest::Method> {
    match method.to_uppercase().as_str() {
        "GET" => Ok(reqwest::Method::GET),
        "POST" => Ok(reqwest::Method::POST),
        "PUT" => Ok(reqwest::Method::PUT),
        "PATCH" => Ok(reqwest::Method::PATCH),
        "DELETE" => Ok(reqwest::Method::DELETE),
        other => Err(EngineError::Validation(format!(
            "Unsupported HTTP method '{}'",
            other
        ))),
    }
}

/// Default headers merged with (and overridable by) caller-supplied
/// headers; every value goes through placeholder substitution.
fn build_headers(config: &WebhookConfig, ctx: &PlaceholderContext) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("user-agent".to_string(), USER_AGENT.to_string()),
    ];

    if let Some(custom) = &config.headers {
        for (name, value) in custom {
            let rendered = render(value, ctx);
            match headers
                .iter_mut()
                .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            {
                Some(entry) => entry.1 = rendered,
                None => headers.push((name.clone(), rendered)),
            }
        }
    }

    headers
}

/// Render the body template and require the result to still be JSON.
fn build_body(
    config: &WebhookConfig,
    ctx: &PlaceholderContext,
) -> EngineResult<Option<serde_json::Value>> {
    match &config.body_template {
        Some(template) => {
            let rendered = render(template, ctx);
            let value = serde_json::from_str(&rendered).map_err(|e| {
                EngineError::Validation(format!(
                    "Webhook body is not valid JSON after substitution: {}",
                    e
                ))
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert!(parse_method("post").is_ok());
        assert!(parse_method("GET").is_ok());
        assert!(parse_method("TRACE").is_err());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte characters are cut on char boundaries.
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
