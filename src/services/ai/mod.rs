pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{ConversationTurn, FunctionDefinition};

/// A function invocation requested by the model; `arguments` is raw JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    User(String),
    Assistant(String),
    /// Record of a function call the assistant made earlier.
    FunctionCall(FunctionCall),
    FunctionResult { name: String, content: String },
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        match turn {
            ConversationTurn::User { content } => ChatMessage::User(content.clone()),
            ConversationTurn::Assistant { content } => ChatMessage::Assistant(content.clone()),
            ConversationTurn::Function { name, content } => ChatMessage::FunctionResult {
                name: name.clone(),
                content: content.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Text(Option<String>),
    FunctionCall(FunctionCall),
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// An empty `functions` slice means the model must answer in text.
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        functions: &[FunctionDefinition],
    ) -> anyhow::Result<ModelReply>;
}
