use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ChatMessage, FunctionCall, LlmProvider, ModelReply};
use crate::models::FunctionDefinition;

pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn request_body(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        functions: &[FunctionDefinition],
    ) -> Value {
        let mut chat_messages = vec![json!({
            "role": "system",
            "content": system_prompt,
        })];
        chat_messages.extend(messages.iter().map(message_json));

        let mut body = json!({
            "model": self.model,
            "messages": chat_messages,
        });

        if !functions.is_empty() {
            let definitions: Vec<Value> = functions
                .iter()
                .map(|f| {
                    json!({
                        "name": f.name,
                        "description": f.description,
                        "parameters": f.schema(),
                    })
                })
                .collect();
            body["functions"] = Value::Array(definitions);
            body["function_call"] = json!("auto");
        }

        body
    }
}

fn message_json(message: &ChatMessage) -> Value {
    match message {
        ChatMessage::User(content) => json!({ "role": "user", "content": content }),
        ChatMessage::Assistant(content) => json!({ "role": "assistant", "content": content }),
        ChatMessage::FunctionCall(call) => json!({
            "role": "assistant",
            "content": null,
            "function_call": { "name": call.name, "arguments": call.arguments },
        }),
        ChatMessage::FunctionResult { name, content } => json!({
            "role": "function",
            "name": name,
            "content": content,
        }),
    }
}

fn parse_reply(data: &Value) -> anyhow::Result<ModelReply> {
    let message = data["choices"][0]
        .get("message")
        .ok_or_else(|| anyhow::anyhow!("missing message in OpenAI response"))?;

    // Some compatible servers answer with tool_calls even for the functions API.
    let call = message
        .get("function_call")
        .filter(|c| c.is_object())
        .or_else(|| message["tool_calls"][0].get("function"));

    if let Some(call) = call {
        let name = call["name"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("function call without a name in OpenAI response"))?;
        return Ok(ModelReply::FunctionCall(FunctionCall {
            name: name.to_string(),
            arguments: call["arguments"].as_str().unwrap_or_default().to_string(),
        }));
    }

    Ok(ModelReply::Text(
        message["content"].as_str().map(|s| s.to_string()),
    ))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        functions: &[FunctionDefinition],
    ) -> anyhow::Result<ModelReply> {
        let body = self.request_body(system_prompt, messages, functions);

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call OpenAI API")?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .context("failed to parse OpenAI response")?;

        if !status.is_success() {
            anyhow::bail!("OpenAI API error ({}): {}", status, data["error"]["message"]);
        }

        tracing::debug!(model = %self.model, functions = functions.len(), "model call completed");

        parse_reply(&data)
    }
}
