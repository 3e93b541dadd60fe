use chrono::Local;

use crate::errors::AppError;
use crate::models::{catalogue, ConversationTurn, Session};
use crate::services::ai::prompt::{system_prompt, FOLLOW_UP_PROMPT};
use crate::services::ai::{ChatMessage, FunctionCall, LlmProvider, ModelReply};
use crate::services::backend::AppointmentBackend;
use crate::services::operations::{OperationCall, OperationOutcome};

pub const NOT_UNDERSTOOD_REPLY: &str = "I couldn't understand your request.";
pub const NO_FOLLOW_UP_REPLY: &str = "I processed your request but couldn't generate a response.";

/// What the first model call decided to do with the user's message.
#[derive(Debug)]
enum Decision {
    Answer(String),
    Invoke(FunctionCall),
}

/// Everything the second model call needs to phrase the final reply.
pub struct FollowUp<'a> {
    pub message: &'a str,
    pub call: &'a FunctionCall,
    pub outcome: &'a OperationOutcome,
}

/// A successful turn: the reply and the turns to commit after the user turn.
struct CompletedTurn {
    reply: String,
    turns: Vec<ConversationTurn>,
}

pub struct Assistant {
    llm: Box<dyn LlmProvider>,
    backend: Box<dyn AppointmentBackend>,
}

impl Assistant {
    pub fn new(llm: Box<dyn LlmProvider>, backend: Box<dyn AppointmentBackend>) -> Self {
        Self { llm, backend }
    }

    /// Runs one turn. Failures become an error reply; the user turn is kept
    /// either way, everything else is committed only when the turn succeeds.
    pub async fn process_message(&self, session: &mut Session, message: &str) -> String {
        session.push(ConversationTurn::user(message));

        let outcome = self.run_turn(session, message).await;
        match outcome {
            Ok(turn) => {
                session.extend(turn.turns);
                turn.reply
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to process message");
                format!("Sorry, I encountered an error: {e}")
            }
        }
    }

    async fn run_turn(&self, session: &Session, message: &str) -> Result<CompletedTurn, AppError> {
        let call = match self.decide(session).await? {
            Decision::Answer(reply) => {
                return Ok(CompletedTurn {
                    turns: vec![ConversationTurn::assistant(reply.clone())],
                    reply,
                });
            }
            Decision::Invoke(call) => call,
        };

        tracing::info!(
            operation = %call.name,
            agent_id = session.agent_id(),
            client_id = session.client_id(),
            "model selected operation"
        );

        let request = OperationCall::decode(&call)?.resolve(session)?;
        let outcome = request.execute(self.backend.as_ref()).await?;

        let reply = self
            .follow_up(FollowUp {
                message,
                call: &call,
                outcome: &outcome,
            })
            .await?;

        Ok(CompletedTurn {
            turns: vec![
                ConversationTurn::function(outcome.operation.name(), outcome.content),
                ConversationTurn::assistant(reply.clone()),
            ],
            reply,
        })
    }

    async fn decide(&self, session: &Session) -> Result<Decision, AppError> {
        let system = system_prompt(Local::now().date_naive());
        let messages: Vec<ChatMessage> = session.history().iter().map(ChatMessage::from).collect();

        let reply = self
            .llm
            .chat(&system, &messages, &catalogue())
            .await
            .map_err(|e| AppError::ModelCall(format!("{e:#}")))?;

        Ok(match reply {
            ModelReply::FunctionCall(call) => Decision::Invoke(call),
            ModelReply::Text(text) => Decision::Answer(
                text.filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| NOT_UNDERSTOOD_REPLY.to_string()),
            ),
        })
    }

    async fn follow_up(&self, input: FollowUp<'_>) -> Result<String, AppError> {
        let messages = [
            ChatMessage::User(input.message.to_string()),
            ChatMessage::FunctionCall(input.call.clone()),
            ChatMessage::FunctionResult {
                name: input.call.name.clone(),
                content: input.outcome.content.clone(),
            },
        ];

        let reply = self
            .llm
            .chat(FOLLOW_UP_PROMPT, &messages, &[])
            .await
            .map_err(|e| AppError::ModelCall(format!("{e:#}")))?;

        Ok(match reply {
            ModelReply::Text(Some(text)) if !text.trim().is_empty() => text,
            ModelReply::Text(_) => NO_FOLLOW_UP_REPLY.to_string(),
            ModelReply::FunctionCall(call) => {
                tracing::warn!(operation = %call.name, "ignoring function call in follow-up reply");
                NO_FOLLOW_UP_REPLY.to_string()
            }
        })
    }
}
