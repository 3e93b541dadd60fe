use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ConversationTurn {
    User { content: String },
    Assistant { content: String },
    Function { name: String, content: String },
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        ConversationTurn::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ConversationTurn::Assistant {
            content: content.into(),
        }
    }

    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        ConversationTurn::Function {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            ConversationTurn::User { .. } => "user",
            ConversationTurn::Assistant { .. } => "assistant",
            ConversationTurn::Function { .. } => "function",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ConversationTurn::User { content }
            | ConversationTurn::Assistant { content }
            | ConversationTurn::Function { content, .. } => content,
        }
    }
}

/// One chat session: the agent/client scope plus its append-only history.
#[derive(Debug, Clone)]
pub struct Session {
    agent_id: String,
    client_id: String,
    history: Vec<ConversationTurn>,
}

impl Session {
    pub fn new(agent_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            client_id: client_id.into(),
            history: Vec::new(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
    }

    pub fn extend(&mut self, turns: impl IntoIterator<Item = ConversationTurn>) {
        self.history.extend(turns);
    }

    /// Starts over with an empty history, keeping the agent/client scope.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}
