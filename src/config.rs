use std::env;

use crate::cli::Args;
use crate::errors::AppError;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub server_url: String,
    pub openai_url: String,
    pub model: String,
    pub agent_id: String,
    pub client_id: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("API_KEY")
                .or_else(|_| env::var("OPENAI_API_KEY"))
                .unwrap_or_default(),
            server_url: env::var("SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
            openai_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            agent_id: env::var("AGENT_ID").unwrap_or_else(|_| "1".to_string()),
            client_id: env::var("CLIENT_ID").unwrap_or_else(|_| "1".to_string()),
        }
    }

    /// Command-line flags win over whatever the environment provided.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(key) = &args.api_key {
            self.api_key = key.clone();
        }
        if let Some(server) = &args.server {
            self.server_url = server.clone();
        }
        if let Some(model) = &args.model {
            self.model = model.clone();
        }
        if let Some(agent) = &args.agent {
            self.agent_id = agent.clone();
        }
        if let Some(client) = &args.client {
            self.client_id = client.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config(
                "API key is required but not provided (set API_KEY or pass --api-key)".to_string(),
            ));
        }
        Ok(())
    }
}
