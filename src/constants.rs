// constants file
pub const DEFAULT_MODEL_ID: &str = "meta.llama3-70b-instruct-v1:0";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MAX_TOKENS: i32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_TOP_P: f32 = 0.9;
pub const DEFAULT_VERBOSITY: &str = "warn";

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "converse-cli";
pub const ENV_PREFIX: &str = "CONVERSE";

pub const DEFAULT_PROMPT: &str = "You are a very intelligent bot with exceptional critical thinking.
I went to the market and bought 10 apples. I gave 2 apples to your friend and 2 to the helper. I then went and bought 5 more apples and ate 1. How many apples did I remain with?

Let's think step by step.";

pub const DEFAULT_CONFIG_CONTENT: &str = r#"# converse-cli configuration
# Every key is optional; commented values are the built-in defaults.

# verbosity = "warn"

[invocation]
# model_id = "meta.llama3-70b-instruct-v1:0"
# max_tokens = 512
# temperature = 0.5
# top_p = 0.9
# prompt = "..."

# [invocation.additional_model_request_fields]
# top_k = 50

[aws_settings]
# region = "us-east-1"
# profile = "default"
"#;
