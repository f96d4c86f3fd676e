//! The conversational pipeline for one call session.
//!
//! A single sequential loop with blocking stage-to-stage handoff: transcript
//! in, model turn, tool dispatch, speech synthesis, audio out. No stage runs
//! concurrently with another within one session; suspension happens only at
//! I/O boundaries. Errors are never retried here; they propagate up and
//! terminate the bot process.

pub mod context;
pub mod transport;

pub use context::ConversationContext;
pub use transport::{Transport, TransportError, TransportEvent};

use std::sync::Arc;

use tracing::{debug, info};

use crate::llm::{LlmError, LlmReply, ToolDescriptor, TurnGenerator};
use crate::tools::{CallSignal, ReceptionistTools};
use crate::tts::{SpeechSynthesizer, TtsError};

/// Pipeline-level errors. Each wraps the failing stage's error unchanged.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Synthesis error: {0}")]
    Tts(#[from] TtsError),
}

/// How the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The turn loop ended because the call was transferred
    Transferred,
    /// The remote participant left or the room closed
    Disconnected,
}

/// Drives one session's turn loop over the trait seams.
pub struct PipelineRunner {
    transport: Box<dyn Transport>,
    llm: Box<dyn TurnGenerator>,
    tts: Box<dyn SpeechSynthesizer>,
    tools: Arc<ReceptionistTools>,
    context: ConversationContext,
    descriptors: Vec<ToolDescriptor>,
}

impl PipelineRunner {
    pub fn new(
        transport: Box<dyn Transport>,
        llm: Box<dyn TurnGenerator>,
        tts: Box<dyn SpeechSynthesizer>,
        tools: Arc<ReceptionistTools>,
    ) -> Self {
        let context = ConversationContext::new(&tools.directory().roster());
        let descriptors = tools.descriptors();
        Self {
            transport,
            llm,
            tts,
            tools,
            context,
            descriptors,
        }
    }

    /// Run the session to completion.
    ///
    /// Waits for the first participant, speaks the greeting, then answers
    /// each final transcript until the caller leaves, the room closes, or a
    /// transfer ends the turn loop.
    pub async fn run(mut self) -> Result<SessionEnd, PipelineError> {
        // The conversation is kicked off by the first participant joining.
        loop {
            match self.transport.next_event().await? {
                Some(TransportEvent::ParticipantJoined { identity }) => {
                    info!(participant = %identity, "First participant joined, greeting");
                    break;
                }
                Some(TransportEvent::Closed) | None => {
                    return Ok(SessionEnd::Disconnected);
                }
                Some(event) => {
                    debug!(?event, "Ignoring pre-join event");
                }
            }
        }

        if self.take_turn().await? {
            self.transport.close().await?;
            return Ok(SessionEnd::Transferred);
        }

        let end = loop {
            match self.transport.next_event().await? {
                Some(TransportEvent::Transcript { text, is_final }) => {
                    if !is_final {
                        continue;
                    }
                    debug!(transcript = %text, "Final transcript");
                    self.context.add_user(&text);
                    if self.take_turn().await? {
                        break SessionEnd::Transferred;
                    }
                }
                Some(TransportEvent::ParticipantLeft { identity }) => {
                    info!(participant = %identity, "Participant left, ending session");
                    break SessionEnd::Disconnected;
                }
                Some(TransportEvent::Closed) | None => {
                    break SessionEnd::Disconnected;
                }
                Some(TransportEvent::ParticipantJoined { identity }) => {
                    debug!(participant = %identity, "Additional participant joined");
                }
            }
        };

        self.transport.close().await?;
        Ok(end)
    }

    /// One model turn: chat, execute any tool invocations, speak the reply.
    ///
    /// Returns `true` when a transfer signal was raised; the caller ends the
    /// turn loop after the closing line has been spoken.
    async fn take_turn(&mut self) -> Result<bool, PipelineError> {
        let mut transferring = false;

        loop {
            let reply = self
                .llm
                .chat(self.context.messages(), &self.descriptors)
                .await?;

            match reply {
                LlmReply::Say(text) => {
                    self.speak(&text).await?;
                    self.context.add_assistant(&text);
                    break;
                }
                LlmReply::Invoke { say, calls } => {
                    self.context.add_assistant_invocation(say.as_deref(), &calls);
                    if let Some(text) = say {
                        self.speak(&text).await?;
                    }

                    for call in &calls {
                        // Tell the caller what is happening before the tool
                        // executes (hold music would go here in a real system).
                        if let Some(line) = ReceptionistTools::announcement(&call.name) {
                            self.speak(line).await?;
                        }

                        let outcome = self.tools.dispatch(call);
                        match &outcome.signal {
                            Some(CallSignal::Hold) => {
                                info!("Caller placed on hold");
                            }
                            Some(CallSignal::Transfer(person)) => {
                                info!(person = %person, "Transfer signaled, turn loop will end");
                                transferring = true;
                            }
                            None => {}
                        }
                        self.context.add_tool_result(&call.id, &outcome.result);
                    }
                    // Loop back so the model can react to the tool results.
                }
            }
        }

        Ok(transferring)
    }

    async fn speak(&mut self, text: &str) -> Result<(), PipelineError> {
        let audio = self.tts.synthesize(text).await?;
        self.transport.send_speech(audio).await?;
        Ok(())
    }
}
