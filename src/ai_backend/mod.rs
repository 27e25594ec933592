pub mod bedrock;
pub mod common;

pub use bedrock::BedrockAiBackend;
pub use common::AiBackend;
