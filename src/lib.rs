//! Single-shot text generation against a Bedrock-hosted model.
//!
//! [`Invoker`] hands a [`ConverseRequest`] to an [`AiBackend`] and pulls
//! `output.message.content[0].text` out of the reply.

pub mod ai_backend;
pub mod command;
pub mod constants;
pub mod conversation;
pub mod error;
pub mod invoker;
pub mod settings;

pub use ai_backend::{AiBackend, BedrockAiBackend};
pub use command::{set_configured_verbosity, ConverseArgs, ConverseCli};
pub use conversation::{ConverseRequest, ConverseResponse};
pub use error::{FaultKind, InvocationError, TransportFault};
pub use invoker::{emit, Invoker, EXIT_FAILURE, EXIT_SUCCESS};
pub use settings::Settings;
