//! Request and response shapes for a single Converse exchange.
//!
//! Both sides serialize in the camelCase wire form the Converse operation uses,
//! so a request can be inspected as JSON and stub responses can be written as
//! JSON fixtures.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::settings::InvocationSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentBlock {
    /// `None` for non-text blocks (images, tool use, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    pub max_tokens: i32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverseRequest {
    pub model_id: String,
    pub messages: Vec<Turn>,
    pub inference_config: InferenceConfig,
    pub additional_model_request_fields: Map<String, Value>,
}

impl ConverseRequest {
    /// A one-turn conversation carrying the configured prompt as the user message.
    pub fn single_turn(settings: &InvocationSettings) -> Self {
        Self {
            model_id: settings.model_id.clone(),
            messages: vec![Turn::user(settings.prompt.as_str())],
            inference_config: InferenceConfig {
                max_tokens: settings.max_tokens,
                temperature: settings.temperature,
                top_p: settings.top_p,
            },
            additional_model_request_fields: settings.additional_model_request_fields.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConverseOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Turn>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConverseResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ConverseOutput>,
}

impl ConverseResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            output: Some(ConverseOutput {
                message: Some(Turn {
                    role: Role::Assistant,
                    content: vec![ContentBlock::text(text)],
                }),
            }),
        }
    }

    /// Walks `output.message.content[0].text`, naming the first missing step on failure.
    pub fn first_text(&self) -> Result<&str, &'static str> {
        let output = self.output.as_ref().ok_or("output")?;
        let message = output.message.as_ref().ok_or("output.message")?;
        let block = message.content.first().ok_or("output.message.content[0]")?;
        block
            .text
            .as_deref()
            .ok_or("output.message.content[0].text")
    }
}
