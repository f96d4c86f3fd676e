//! Language-model seam and the OpenAI chat-completions implementation.
//!
//! The pipeline hands the full conversation history plus the receptionist
//! tool descriptors to a `TurnGenerator` and gets back either a spoken reply
//! or a set of tool invocations to execute.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default OpenAI API base URL.
pub const OPENAI_API_URL: &str = "https://api.openai.com";

/// A function the model may invoke mid-conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's arguments
    pub parameters: Value,
}

/// One tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier assigned by the model for this call
    pub id: String,
    pub name: String,
    /// Decoded JSON arguments
    pub arguments: Value,
}

/// The model's answer for one turn.
#[derive(Debug)]
pub enum LlmReply {
    /// A plain spoken reply
    Say(String),
    /// One or more tool invocations, optionally preceded by spoken text
    Invoke {
        say: Option<String>,
        calls: Vec<ToolCall>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Seam between the pipeline and the hosted language model.
#[async_trait]
pub trait TurnGenerator: Send + Sync {
    async fn chat(
        &self,
        messages: &[Value],
        tools: &[ToolDescriptor],
    ) -> Result<LlmReply, LlmError>;
}

/// OpenAI chat-completions client with function calling.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: OPENAI_API_URL.to_string(),
            model,
        }
    }

    /// Override the base URL (used against local stand-ins in tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_tools(tools: &[ToolDescriptor]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect()
    }
}

#[async_trait]
impl TurnGenerator for OpenAiClient {
    async fn chat(
        &self,
        messages: &[Value],
        tools: &[ToolDescriptor],
    ) -> Result<LlmReply, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });
        if !tools.is_empty() {
            body["tools"] = Value::Array(Self::build_tools(tools));
        }

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(LlmError::Http(format!("OpenAI API error {status}: {body}")));
        }

        parse_reply(&body)
    }
}

/// Parse a chat-completions response body into an `LlmReply`.
pub fn parse_reply(body: &Value) -> Result<LlmReply, LlmError> {
    let message = &body["choices"][0]["message"];
    if !message.is_object() {
        return Err(LlmError::InvalidResponse(format!(
            "missing choices[0].message in {body}"
        )));
    }

    let content = message["content"].as_str().map(|s| s.to_string());

    if let Some(calls_json) = message["tool_calls"].as_array() {
        let calls: Vec<ToolCall> = calls_json
            .iter()
            .filter_map(|tc| {
                let id = tc["id"].as_str()?.to_string();
                let name = tc["function"]["name"].as_str()?.to_string();
                let arguments: Value =
                    serde_json::from_str(tc["function"]["arguments"].as_str()?).unwrap_or_default();
                Some(ToolCall {
                    id,
                    name,
                    arguments,
                })
            })
            .collect();

        if calls.is_empty() {
            return Err(LlmError::InvalidResponse(
                "tool_calls present but undecodable".to_string(),
            ));
        }

        return Ok(LlmReply::Invoke {
            say: content.filter(|s| !s.is_empty()),
            calls,
        });
    }

    match content {
        Some(text) => Ok(LlmReply::Say(text)),
        None => Err(LlmError::InvalidResponse(
            "message has neither content nor tool_calls".to_string(),
        )),
    }
}
