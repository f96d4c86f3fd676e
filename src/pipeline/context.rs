//! Conversation context for one call session.
//!
//! Holds the ordered message history fed to the model on every turn. Turns
//! are ephemeral; nothing here is persisted.

use serde_json::{Value, json};

use crate::llm::ToolCall;

/// Ordered chat history, starting with the receptionist system prompt.
pub struct ConversationContext {
    messages: Vec<Value>,
}

impl ConversationContext {
    /// Build a fresh context with the receptionist system prompt for the
    /// given staff roster.
    pub fn new(roster: &[String]) -> Self {
        Self {
            messages: vec![json!({
                "role": "system",
                "content": system_prompt(roster),
            })],
        }
    }

    pub fn messages(&self) -> &[Value] {
        &self.messages
    }

    pub fn add_user(&mut self, text: &str) {
        self.messages.push(json!({
            "role": "user",
            "content": text,
        }));
    }

    pub fn add_assistant(&mut self, text: &str) {
        self.messages.push(json!({
            "role": "assistant",
            "content": text,
        }));
    }

    /// Record an assistant turn that invoked tools, so the tool results that
    /// follow are attributed correctly.
    pub fn add_assistant_invocation(&mut self, say: Option<&str>, calls: &[ToolCall]) {
        let tool_calls: Vec<Value> = calls
            .iter()
            .map(|call| {
                json!({
                    "id": call.id,
                    "type": "function",
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments.to_string(),
                    },
                })
            })
            .collect();
        self.messages.push(json!({
            "role": "assistant",
            "content": say,
            "tool_calls": tool_calls,
        }));
    }

    pub fn add_tool_result(&mut self, call_id: &str, result: &Value) {
        self.messages.push(json!({
            "role": "tool",
            "tool_call_id": call_id,
            "content": result.to_string(),
        }));
    }
}

fn system_prompt(roster: &[String]) -> String {
    let people = roster
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a helpful receptionist for a legal company. Your job is to:\n\
         1. Greet callers and ask who they would like to speak with.\n\
         The available people are:\n{people}\n\
         2. Put them on hold while you check if the person is available\n\
         3. If the person is available, transfer the call\n\
         4. If the person is not available, offer to take a message\n\n\
         Always be polite, professional, and efficient. Start by greeting the caller \
         and asking who they'd like to speak with.\n\n\
         When the caller provides a name, use the check_person_availability function.\n\
         Before checking availability, use the put_caller_on_hold function.\n\
         If the person is available, use the transfer_call function.\n\
         If the person is not available, use the take_message function.\n\n\
         Your output will be converted to audio so don't include special characters \
         in your answers."
    )
}
