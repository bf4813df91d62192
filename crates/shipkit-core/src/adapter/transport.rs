use crate::error::TransportError;
use crate::outcome::{Request, Response};

/// The single I/O boundary of an adapter operation.
///
/// Implementations return `Ok` only for 2xx responses; anything else becomes
/// [`TransportError::Http`] carrying the response so the carrier's message
/// extractor can read it. Retries, if any, belong to the implementation.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}
