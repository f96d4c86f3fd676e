//! Receptionist tools callable by the language model.
//!
//! Four tools: hold, availability check, transfer, message taking. Each
//! dispatch is synchronous from the pipeline's point of view and returns a
//! JSON result that is fed back to the model, plus an optional call-control
//! signal consumed by the turn loop.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::info;

use crate::directory::StaffDirectory;
use crate::llm::{ToolCall, ToolDescriptor};

pub const PUT_CALLER_ON_HOLD: &str = "put_caller_on_hold";
pub const CHECK_PERSON_AVAILABILITY: &str = "check_person_availability";
pub const TRANSFER_CALL: &str = "transfer_call";
pub const TAKE_MESSAGE: &str = "take_message";

/// Call-control signal raised by a tool, consumed by the pipeline runner.
#[derive(Debug, Clone, PartialEq)]
pub enum CallSignal {
    /// Caller placed on hold while availability is checked
    Hold,
    /// End the AI-driven turn loop; the named person takes over
    Transfer(String),
}

/// Result of executing one tool call.
#[derive(Debug)]
pub struct ToolOutcome {
    /// JSON payload fed back to the model as the tool result
    pub result: Value,
    pub signal: Option<CallSignal>,
}

impl ToolOutcome {
    fn result(result: Value) -> Self {
        Self {
            result,
            signal: None,
        }
    }
}

/// A message taken for an unavailable staff member. Held in memory for the
/// lifetime of the bot process only.
#[derive(Debug, Clone, PartialEq)]
pub struct TakenMessage {
    pub person_name: String,
    pub message: String,
}

/// The receptionist's tool handlers.
pub struct ReceptionistTools {
    directory: Arc<dyn StaffDirectory>,
    messages: Mutex<Vec<TakenMessage>>,
}

impl ReceptionistTools {
    pub fn new(directory: Arc<dyn StaffDirectory>) -> Self {
        Self {
            directory,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn directory(&self) -> &dyn StaffDirectory {
        self.directory.as_ref()
    }

    /// Messages recorded so far in this session.
    pub fn messages(&self) -> Vec<TakenMessage> {
        self.messages.lock().clone()
    }

    /// Tool descriptors advertised to the model.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor {
                name: PUT_CALLER_ON_HOLD.to_string(),
                description: "Put the caller on hold while checking for the requested person"
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {},
                }),
            },
            ToolDescriptor {
                name: CHECK_PERSON_AVAILABILITY.to_string(),
                description: "Check if a person is available to take the call".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "person_name": {
                            "type": "string",
                            "description": "The name of the person to check availability for",
                        },
                    },
                    "required": ["person_name"],
                }),
            },
            ToolDescriptor {
                name: TRANSFER_CALL.to_string(),
                description: "Transfer the call to the requested person".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "person_name": {
                            "type": "string",
                            "description": "The name of the person to transfer the call to",
                        },
                    },
                    "required": ["person_name"],
                }),
            },
            ToolDescriptor {
                name: TAKE_MESSAGE.to_string(),
                description: "Take a message for the unavailable person".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "person_name": {
                            "type": "string",
                            "description": "The name of the person to take a message for",
                        },
                        "message": {
                            "type": "string",
                            "description": "The message to be recorded",
                        },
                    },
                    "required": ["person_name", "message"],
                }),
            },
        ]
    }

    /// The line spoken to the caller before a tool executes.
    pub fn announcement(tool_name: &str) -> Option<&'static str> {
        match tool_name {
            PUT_CALLER_ON_HOLD => {
                Some("I'll put you on hold while I check if they're available. Please hold.")
            }
            CHECK_PERSON_AVAILABILITY => Some("Checking if they're available..."),
            TRANSFER_CALL => Some("Great news! I'm transferring you now. Please hold."),
            TAKE_MESSAGE => Some("I'll take a message for them."),
            _ => None,
        }
    }

    /// Execute one tool call.
    ///
    /// Unknown tools report an error result back to the model instead of
    /// failing the pipeline.
    pub fn dispatch(&self, call: &ToolCall) -> ToolOutcome {
        match call.name.as_str() {
            PUT_CALLER_ON_HOLD => self.put_caller_on_hold(),
            CHECK_PERSON_AVAILABILITY => self.check_person_availability(&call.arguments),
            TRANSFER_CALL => self.transfer_call(&call.arguments),
            TAKE_MESSAGE => self.take_message(&call.arguments),
            other => ToolOutcome::result(json!({
                "error": format!("unknown tool: {other}"),
            })),
        }
    }

    fn put_caller_on_hold(&self) -> ToolOutcome {
        ToolOutcome {
            result: json!({
                "status": "on_hold",
                "message": "Caller has been put on hold",
            }),
            signal: Some(CallSignal::Hold),
        }
    }

    fn check_person_availability(&self, arguments: &Value) -> ToolOutcome {
        let person_name = string_arg(arguments, "person_name");
        let is_available = self.directory.availability(&person_name).is_available();
        info!(person = %person_name, is_available, "Checked availability");
        ToolOutcome::result(json!({
            "person_name": person_name,
            "is_available": is_available,
        }))
    }

    fn transfer_call(&self, arguments: &Value) -> ToolOutcome {
        let person_name = string_arg(arguments, "person_name");
        info!(person = %person_name, "Transferring call");
        // Demo: no real call-control signaling to a VOIP trunk; the signal
        // just ends the AI-driven turn loop for this session.
        ToolOutcome {
            result: json!({
                "status": "transferred",
                "person_name": person_name,
            }),
            signal: Some(CallSignal::Transfer(person_name)),
        }
    }

    fn take_message(&self, arguments: &Value) -> ToolOutcome {
        let person_name = string_arg(arguments, "person_name");
        let message = string_arg(arguments, "message");
        info!(person = %person_name, "Taking message");
        self.messages.lock().push(TakenMessage {
            person_name: person_name.clone(),
            message,
        });
        ToolOutcome::result(json!({
            "status": "message_recorded",
            "person_name": person_name,
        }))
    }
}

fn string_arg(arguments: &Value, key: &str) -> String {
    arguments[key].as_str().unwrap_or_default().to_string()
}
