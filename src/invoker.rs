use std::io::{self, Write};

use tracing::{debug, info, instrument};

use crate::ai_backend::AiBackend;
use crate::conversation::ConverseRequest;
use crate::error::InvocationError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Sends a request through a backend and turns the reply into text or an [`InvocationError`].
pub struct Invoker<B> {
    backend: B,
}

impl<B: AiBackend> Invoker<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Single attempt: any backend fault is returned as is, without retrying.
    #[instrument(skip_all, fields(model_id = %request.model_id))]
    pub fn invoke(&self, request: &ConverseRequest) -> Result<String, InvocationError> {
        let response = self
            .backend
            .converse(request)
            .map_err(|fault| {
                debug!(kind = %fault.kind, "Converse call failed");
                InvocationError::Transport {
                    model_id: request.model_id.clone(),
                    fault,
                }
            })?;

        let text = response
            .first_text()
            .map_err(|missing| InvocationError::MalformedResponse {
                model_id: request.model_id.clone(),
                missing,
            })?;
        info!("Generated {} bytes of text", text.len());
        Ok(text.to_string())
    }

    /// [`invoke`](Self::invoke) followed by [`emit`], returning the process exit status.
    pub fn run<O: Write, E: Write>(
        &self,
        request: &ConverseRequest,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<u8> {
        emit(self.invoke(request), out, err)
    }
}

/// Prints the text to `out`, or an `ERROR:` line to `err`.
pub fn emit<O: Write, E: Write>(
    result: Result<String, InvocationError>,
    out: &mut O,
    err: &mut E,
) -> io::Result<u8> {
    match result {
        Ok(text) => {
            writeln!(out, "{}", text)?;
            out.flush()?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            debug!(malformed_response = e.is_malformed_response(), "Invocation failed");
            writeln!(err, "ERROR: {}", e)?;
            err.flush()?;
            Ok(EXIT_FAILURE)
        }
    }
}
