mod client;
mod providers;
mod retry;

pub use client::LlmClient;
pub use providers::{
    parse_chat_response, ApiError, ChatResponse, FunctionCall, Message, OpenAIProvider, Provider, Role,
    ToolCall, ToolDefinition, OPENAI_BASE_URL,
};
pub use retry::{is_retryable_error, with_retry, RetryConfig, RetryDecision};
