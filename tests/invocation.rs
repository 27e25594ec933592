use std::sync::Mutex;

use converse_cli::conversation::Role;
use converse_cli::{
    AiBackend, ConverseRequest, ConverseResponse, FaultKind, Invoker, Settings, TransportFault,
    EXIT_FAILURE, EXIT_SUCCESS,
};
use serde_json::json;

/// Replays one canned reply and keeps every request it was handed.
struct RecordingBackend {
    reply: Result<ConverseResponse, TransportFault>,
    requests: Mutex<Vec<ConverseRequest>>,
}

impl RecordingBackend {
    fn new(reply: Result<ConverseResponse, TransportFault>) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<ConverseRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl AiBackend for RecordingBackend {
    fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, TransportFault> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

fn default_settings() -> Settings {
    let dir = tempfile::tempdir().unwrap();
    let no_env = Settings::environment().source(Some(config::Map::new()));
    Settings::load_with(&dir.path().join("config.toml"), no_env).unwrap()
}

fn run_once(backend: &RecordingBackend, request: &ConverseRequest) -> (String, String, u8) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = Invoker::new(backend).run(request, &mut out, &mut err).unwrap();
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
        code,
    )
}

#[test]
fn well_formed_reply_is_printed() {
    let backend = RecordingBackend::new(Ok(ConverseResponse::from_text("T")));
    let request = ConverseRequest::single_turn(&default_settings().invocation);

    let (out, err, code) = run_once(&backend, &request);

    assert_eq!(out, "T\n");
    assert_eq!(err, "");
    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(backend.requests().len(), 1);
}

#[test]
fn transport_fault_names_model_and_reason() {
    let backend = RecordingBackend::new(Err(TransportFault::new(FaultKind::Network, "R")));
    let mut settings = default_settings();
    settings.invocation.model_id = "M".into();
    let request = ConverseRequest::single_turn(&settings.invocation);

    let (out, err, code) = run_once(&backend, &request);

    assert_eq!(out, "");
    assert!(err.contains("M"));
    assert!(err.contains("R"));
    assert!(err.starts_with("ERROR: Can't invoke 'M'. Reason: "));
    assert_eq!(code, EXIT_FAILURE);
}

#[test]
fn reply_without_text_fails_cleanly() {
    let fixtures = [
        json!({}),
        json!({ "output": {} }),
        json!({ "output": { "message": { "role": "assistant", "content": [] } } }),
        json!({ "output": { "message": { "role": "assistant", "content": [{ "image": {} }] } } }),
    ];
    let request = ConverseRequest::single_turn(&default_settings().invocation);

    for fixture in fixtures {
        let response: ConverseResponse = serde_json::from_value(fixture).unwrap();
        let backend = RecordingBackend::new(Ok(response));

        let err = Invoker::new(&backend).invoke(&request).unwrap_err();
        assert!(err.is_malformed_response());

        let (out, _, code) = run_once(&backend, &request);
        assert_eq!(out, "");
        assert_eq!(code, EXIT_FAILURE);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let request = ConverseRequest::single_turn(&default_settings().invocation);

    let ok = RecordingBackend::new(Ok(ConverseResponse::from_text("same")));
    assert_eq!(run_once(&ok, &request), run_once(&ok, &request));

    let failing = RecordingBackend::new(Err(TransportFault::new(FaultKind::Service, "down")));
    assert_eq!(run_once(&failing, &request), run_once(&failing, &request));
}

#[test]
fn default_request_carries_one_user_turn_and_inference_knobs() {
    let settings = default_settings();
    let backend = RecordingBackend::new(Ok(ConverseResponse::from_text("T")));
    let request = ConverseRequest::single_turn(&settings.invocation);

    run_once(&backend, &request);

    let sent = backend.requests();
    assert_eq!(sent.len(), 1);
    let sent = &sent[0];
    assert_eq!(sent.model_id, "meta.llama3-70b-instruct-v1:0");
    assert_eq!(sent.messages.len(), 1);
    assert_eq!(sent.messages[0].role, Role::User);
    assert_eq!(sent.messages[0].content.len(), 1);
    assert_eq!(
        sent.messages[0].content[0].text.as_deref(),
        Some(settings.invocation.prompt.as_str())
    );
    assert_eq!(sent.inference_config.max_tokens, 512);
    assert_eq!(sent.inference_config.temperature, 0.5);
    assert_eq!(sent.inference_config.top_p, 0.9);

    let wire = serde_json::to_value(sent).unwrap();
    assert_eq!(wire["messages"][0]["role"], "user");
    assert_eq!(wire["inferenceConfig"]["maxTokens"], 512);
    assert_eq!(wire["additionalModelRequestFields"], json!({}));
}
