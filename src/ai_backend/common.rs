use crate::conversation::{ConverseRequest, ConverseResponse};
use crate::error::TransportFault;

/// One synchronous, non-streamed exchange with a text-generation service.
pub trait AiBackend {
    fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, TransportFault>;
}

impl<B: AiBackend + ?Sized> AiBackend for &B {
    fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, TransportFault> {
        (**self).converse(request)
    }
}
