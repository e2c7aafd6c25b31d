use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A function call requested by the assistant, in chat-completions wire form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// Raw JSON text exactly as sent by the API
    #[serde(default)]
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub stop_reason: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::assistant(content)
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::plain(Role::Tool, content)
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: function_kind(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Decode the argument string; an empty string means no arguments.
    pub fn parse_arguments(&self) -> Result<Value> {
        let raw = self.function.arguments.trim();
        if raw.is_empty() {
            return Ok(json!({}));
        }
        serde_json::from_str(raw)
            .with_context(|| format!("Invalid arguments for tool '{}'", self.function.name))
    }
}

impl ToolDefinition {
    pub fn to_openai(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<ChatResponse>;
    fn name(&self) -> &str;
}

// ============================================================================
// OPENAI-COMPATIBLE PROVIDER (chat completions + function calling)
// ============================================================================

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Failure talking to the chat-completions endpoint, kept typed so the
/// retry layer can decide on the status code instead of the message text.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Chat completion request failed")]
    Transport(#[source] reqwest::Error),

    #[error("Chat completion failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl ApiError {
    /// Throttling, server errors and dropped connections are worth another try
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(e) => !e.is_builder(),
            ApiError::Status { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || *status == reqwest::StatusCode::REQUEST_TIMEOUT
                    || status.is_server_error()
            }
        }
    }
}

pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string());
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn request_body(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Value> {
        let mut body = json!({
            "model": self.model,
            "messages": serde_json::to_value(messages)?,
        });

        if !tools.is_empty() {
            let tools_json: Vec<Value> = tools.iter().map(ToolDefinition::to_openai).collect();
            body["tools"] = json!(tools_json);
            body["tool_choice"] = json!("auto");
        }

        Ok(body)
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<ChatResponse> {
        let body = self.request_body(messages, tools)?;

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::Transport)?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body: text }.into());
        }

        let json: Value =
            serde_json::from_str(&text).context("Chat completion response was not JSON")?;
        parse_chat_response(&json)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Extract the first choice of a chat-completions response
pub fn parse_chat_response(json: &Value) -> Result<ChatResponse> {
    if let Some(error) = json.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        anyhow::bail!("API error: {}", message);
    }

    let message = &json["choices"][0]["message"];
    if message.is_null() {
        anyhow::bail!("Response contained no choices");
    }

    let content = message["content"].as_str().unwrap_or("").to_string();

    let tool_calls = match message.get("tool_calls") {
        Some(calls) if calls.is_array() => serde_json::from_value(calls.clone())
            .context("Malformed tool_calls in response")?,
        _ => Vec::new(),
    };

    let stop_reason = json["choices"][0]["finish_reason"]
        .as_str()
        .map(String::from);

    Ok(ChatResponse {
        content,
        tool_calls,
        stop_reason,
    })
}
