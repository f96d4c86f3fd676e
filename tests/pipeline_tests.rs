//! End-to-end turn-loop scenarios over scripted stub providers.
//!
//! The transport, model and synthesizer are stubbed so the full receptionist
//! flow can be exercised deterministically: greeting, hold, availability
//! check, transfer or message taking.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use frontdesk::directory::StaticDirectory;
use frontdesk::llm::{LlmError, LlmReply, ToolCall, ToolDescriptor, TurnGenerator};
use frontdesk::pipeline::{
    PipelineRunner, SessionEnd, Transport, TransportError, TransportEvent,
};
use frontdesk::tools::ReceptionistTools;
use frontdesk::tts::{AudioData, SpeechSynthesizer, TtsError};

// =============================================================================
// Stubs
// =============================================================================

/// Transport stub that replays a fixed event script and records every spoken
/// line (the stub synthesizer encodes text as UTF-8 audio bytes).
struct ScriptedTransport {
    events: VecDeque<TransportEvent>,
    spoken: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl ScriptedTransport {
    fn new(
        events: Vec<TransportEvent>,
        spoken: Arc<Mutex<Vec<String>>>,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            events: events.into(),
            spoken,
            closed,
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn next_event(&mut self) -> Result<Option<TransportEvent>, TransportError> {
        Ok(self.events.pop_front())
    }

    async fn send_speech(&mut self, audio: AudioData) -> Result<(), TransportError> {
        let text = String::from_utf8(audio.data)
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        self.spoken.lock().push(text);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Model stub that replays a fixed reply script and counts invocations.
struct ScriptedLlm {
    replies: Mutex<VecDeque<LlmReply>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedLlm {
    fn new(replies: Vec<LlmReply>, calls: Arc<AtomicUsize>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls,
        }
    }
}

#[async_trait]
impl TurnGenerator for ScriptedLlm {
    async fn chat(
        &self,
        _messages: &[Value],
        _tools: &[ToolDescriptor],
    ) -> Result<LlmReply, LlmError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.replies
            .lock()
            .pop_front()
            .ok_or_else(|| LlmError::InvalidResponse("scripted replies exhausted".to_string()))
    }
}

/// Synthesizer stub that passes the text through as audio bytes.
struct EchoTts;

#[async_trait]
impl SpeechSynthesizer for EchoTts {
    async fn synthesize(&self, text: &str) -> Result<AudioData, TtsError> {
        Ok(AudioData {
            data: text.as_bytes().to_vec(),
            sample_rate: 24_000,
            format: "pcm_s16le".to_string(),
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn tool_call(id: &str, name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}

struct Scenario {
    runner: PipelineRunner,
    tools: Arc<ReceptionistTools>,
    spoken: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
    llm_calls: Arc<AtomicUsize>,
}

fn scenario(events: Vec<TransportEvent>, replies: Vec<LlmReply>) -> Scenario {
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let closed = Arc::new(AtomicBool::new(false));
    let llm_calls = Arc::new(AtomicUsize::new(0));
    let tools = Arc::new(ReceptionistTools::new(Arc::new(StaticDirectory::default())));

    let runner = PipelineRunner::new(
        Box::new(ScriptedTransport::new(events, spoken.clone(), closed.clone())),
        Box::new(ScriptedLlm::new(replies, llm_calls.clone())),
        Box::new(EchoTts),
        tools.clone(),
    );

    Scenario {
        runner,
        tools,
        spoken,
        closed,
        llm_calls,
    }
}

fn joined() -> TransportEvent {
    TransportEvent::ParticipantJoined {
        identity: "caller-1".to_string(),
    }
}

fn final_transcript(text: &str) -> TransportEvent {
    TransportEvent::Transcript {
        text: text.to_string(),
        is_final: true,
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_available_person_is_transferred_without_message() {
    let s = scenario(
        vec![
            joined(),
            final_transcript("Hi, can I speak with John Doe please?"),
        ],
        vec![
            LlmReply::Say("Hello! Who would you like to speak with?".to_string()),
            LlmReply::Invoke {
                say: None,
                calls: vec![
                    tool_call("c1", "put_caller_on_hold", json!({})),
                    tool_call(
                        "c2",
                        "check_person_availability",
                        json!({"person_name": "John Doe"}),
                    ),
                ],
            },
            LlmReply::Invoke {
                say: None,
                calls: vec![tool_call(
                    "c3",
                    "transfer_call",
                    json!({"person_name": "John Doe"}),
                )],
            },
            LlmReply::Say("Connecting you to John Doe now. Goodbye.".to_string()),
        ],
    );

    let end = s.runner.run().await.unwrap();
    assert_eq!(end, SessionEnd::Transferred);

    // Transfer path must never record a message
    assert!(s.tools.messages().is_empty());
    assert!(s.closed.load(Ordering::Relaxed));

    let spoken = s.spoken.lock();
    assert_eq!(spoken[0], "Hello! Who would you like to speak with?");
    assert!(
        spoken
            .iter()
            .any(|line| line.contains("I'll put you on hold"))
    );
    assert!(
        spoken
            .iter()
            .any(|line| line.contains("Checking if they're available"))
    );
    assert!(
        spoken
            .iter()
            .any(|line| line.contains("I'm transferring you now"))
    );
    assert_eq!(spoken.last().unwrap(), "Connecting you to John Doe now. Goodbye.");
}

#[tokio::test]
async fn test_hold_does_not_end_the_session() {
    let s = scenario(
        vec![
            joined(),
            final_transcript("Is Jane Smith in today?"),
            TransportEvent::ParticipantLeft {
                identity: "caller-1".to_string(),
            },
        ],
        vec![
            LlmReply::Say("Hello! Who would you like to speak with?".to_string()),
            LlmReply::Invoke {
                say: None,
                calls: vec![tool_call("c1", "put_caller_on_hold", json!({}))],
            },
            LlmReply::Say("Thanks for holding. Let me check on Jane Smith.".to_string()),
        ],
    );

    // A hold signal keeps the turn loop going; only the caller leaving ends it
    let end = s.runner.run().await.unwrap();
    assert_eq!(end, SessionEnd::Disconnected);

    let spoken = s.spoken.lock();
    assert!(
        spoken
            .iter()
            .any(|line| line.contains("I'll put you on hold"))
    );
    assert_eq!(
        spoken.last().unwrap(),
        "Thanks for holding. Let me check on Jane Smith."
    );
}

#[tokio::test]
async fn test_unlisted_person_gets_a_message_taken() {
    let s = scenario(
        vec![
            joined(),
            final_transcript("Could I talk to Zaphod Beeblebrox?"),
            final_transcript("Yes, please ask them to call me back."),
            TransportEvent::ParticipantLeft {
                identity: "caller-1".to_string(),
            },
        ],
        vec![
            LlmReply::Say("Hello! Who would you like to speak with?".to_string()),
            LlmReply::Invoke {
                say: None,
                calls: vec![tool_call(
                    "c1",
                    "check_person_availability",
                    json!({"person_name": "Zaphod Beeblebrox"}),
                )],
            },
            LlmReply::Say(
                "I'm sorry, they are not available. Would you like to leave a message?"
                    .to_string(),
            ),
            LlmReply::Invoke {
                say: None,
                calls: vec![tool_call(
                    "c2",
                    "take_message",
                    json!({
                        "person_name": "Zaphod Beeblebrox",
                        "message": "Please ask them to call me back.",
                    }),
                )],
            },
            LlmReply::Say("I've recorded your message. Anything else?".to_string()),
        ],
    );

    let end = s.runner.run().await.unwrap();
    assert_eq!(end, SessionEnd::Disconnected);

    let messages = s.tools.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].person_name, "Zaphod Beeblebrox");
    assert_eq!(messages[0].message, "Please ask them to call me back.");

    let spoken = s.spoken.lock();
    assert!(
        spoken
            .iter()
            .any(|line| line.contains("I'll take a message for them"))
    );
}

#[tokio::test]
async fn test_room_closed_before_join_ends_quietly() {
    let s = scenario(vec![TransportEvent::Closed], vec![]);

    let end = s.runner.run().await.unwrap();
    assert_eq!(end, SessionEnd::Disconnected);
    assert_eq!(s.llm_calls.load(Ordering::Relaxed), 0);
    assert!(s.spoken.lock().is_empty());
}

#[tokio::test]
async fn test_interim_transcripts_are_ignored() {
    let s = scenario(
        vec![
            joined(),
            TransportEvent::Transcript {
                text: "Can I spea".to_string(),
                is_final: false,
            },
            TransportEvent::ParticipantLeft {
                identity: "caller-1".to_string(),
            },
        ],
        vec![LlmReply::Say(
            "Hello! Who would you like to speak with?".to_string(),
        )],
    );

    let end = s.runner.run().await.unwrap();
    assert_eq!(end, SessionEnd::Disconnected);
    // Only the greeting turn; the interim fragment never reaches the model
    assert_eq!(s.llm_calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_model_error_propagates_and_terminates() {
    // Empty reply script: the greeting turn fails immediately
    let s = scenario(vec![joined()], vec![]);

    let err = s.runner.run().await.unwrap_err();
    assert!(err.to_string().contains("scripted replies exhausted"));
}
