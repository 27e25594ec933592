use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::operation::converse::ConverseError;
use aws_sdk_bedrockruntime::types::{
    ContentBlock as SdkContentBlock, ConversationRole, ConverseOutput as SdkOutput,
    InferenceConfiguration, Message,
};
use aws_sdk_bedrockruntime::Client;
use aws_smithy_types::{Document, Number};

use anyhow::Result;
use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::common::AiBackend;
use crate::conversation::{
    ContentBlock, ConverseOutput, ConverseRequest, ConverseResponse, Role, Turn,
};
use crate::error::{FaultKind, TransportFault};
use crate::settings::AwsSettings;

/// Bedrock Runtime `Converse` behind a blocking interface.
pub struct BedrockAiBackend {
    runtime: Runtime,
    client: Client,
}

impl BedrockAiBackend {
    pub fn new(aws_settings: &AwsSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let region = aws_settings.region.clone();
        info!("Using region: {}", region);

        // single attempt per run, no SDK retries
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .retry_config(RetryConfig::disabled());
        if let Some(profile) = &aws_settings.profile {
            info!("Using profile: {}", profile);
            loader = loader.profile_name(profile);
        }
        let sdk_config = runtime.block_on(loader.load());
        info!("Creating bedrock client");
        let client = Client::new(&sdk_config);
        info!("Client created");

        Ok(Self { runtime, client })
    }

    fn to_sdk_message(turn: &Turn) -> Result<Message, TransportFault> {
        let role = match turn.role {
            Role::User => ConversationRole::User,
            Role::Assistant => ConversationRole::Assistant,
        };
        let content = turn
            .content
            .iter()
            .filter_map(|block| block.text.clone().map(SdkContentBlock::Text))
            .collect();
        Message::builder()
            .role(role)
            .set_content(Some(content))
            .build()
            .map_err(|e| {
                TransportFault::new(
                    FaultKind::MalformedRequest,
                    format!("failed to build message: {}", e),
                )
            })
    }

    fn response_from_output(output: Option<&SdkOutput>) -> ConverseResponse {
        let Some(output) = output else {
            return ConverseResponse::default();
        };
        let message = match output.as_message() {
            Ok(message) => message,
            Err(other) => {
                debug!("Received non-message output: {:?}", other);
                return ConverseResponse {
                    output: Some(ConverseOutput::default()),
                };
            }
        };
        let role = match message.role() {
            ConversationRole::User => Role::User,
            _ => Role::Assistant,
        };
        let content = message
            .content()
            .iter()
            .map(|block| ContentBlock {
                text: block.as_text().ok().cloned(),
            })
            .collect();
        ConverseResponse {
            output: Some(ConverseOutput {
                message: Some(Turn { role, content }),
            }),
        }
    }

    fn fault_from_sdk_error(err: &SdkError<ConverseError>) -> TransportFault {
        let kind = match err.as_service_error() {
            Some(e) if e.is_access_denied_exception() => FaultKind::Authentication,
            Some(e) if e.is_throttling_exception() => FaultKind::Throttled,
            Some(e) if e.is_validation_exception() => FaultKind::MalformedRequest,
            Some(_) => FaultKind::Service,
            None => FaultKind::Network,
        };
        let message = err
            .as_service_error()
            .and_then(|e| e.message())
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(err).to_string());
        TransportFault::new(kind, message)
    }
}

fn to_document(value: &Value) -> Document {
    match value {
        Value::Null => Document::Null,
        Value::Bool(b) => Document::Bool(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Document::Number(Number::PosInt(u))
            } else if let Some(i) = n.as_i64() {
                Document::Number(Number::NegInt(i))
            } else {
                Document::Number(Number::Float(n.as_f64().unwrap_or_default()))
            }
        }
        Value::String(s) => Document::String(s.clone()),
        Value::Array(items) => Document::Array(items.iter().map(to_document).collect()),
        Value::Object(fields) => Document::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), to_document(v)))
                .collect(),
        ),
    }
}

impl AiBackend for BedrockAiBackend {
    fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, TransportFault> {
        let messages = request
            .messages
            .iter()
            .map(Self::to_sdk_message)
            .collect::<Result<Vec<_>, _>>()?;
        let inference_config = InferenceConfiguration::builder()
            .max_tokens(request.inference_config.max_tokens)
            .temperature(request.inference_config.temperature)
            .top_p(request.inference_config.top_p)
            .build();
        let additional_fields =
            to_document(&Value::Object(request.additional_model_request_fields.clone()));
        debug!("Inference config: {:?}", inference_config);

        info!("Sending converse request to {}", request.model_id);
        let output = self
            .runtime
            .block_on(
                self.client
                    .converse()
                    .model_id(&request.model_id)
                    .set_messages(Some(messages))
                    .inference_config(inference_config)
                    .additional_model_request_fields(additional_fields)
                    .send(),
            )
            .map_err(|e| Self::fault_from_sdk_error(&e))?;
        info!("Response received");
        debug!(
            "Stop reason: {:?}, usage: {:?}",
            output.stop_reason(),
            output.usage()
        );

        Ok(Self::response_from_output(output.output()))
    }
}
