//! The seam every carrier integration implements.
//!
//! A carrier exposes one [`Operation`] per capability it supports. An
//! operation is a pure serializer plus a parser; [`execute`] sends what the
//! serializer built through a [`Transport`] and hands the response to the
//! parser. Every failure, including transport failures, comes back as the
//! `Err` side of an [`ApiResult`].

use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ApiError, MessageExtractor};
use crate::outcome::{ApiOutcome, ApiResult, Request, Response};

mod envelope;
mod methods;
mod transport;

pub use envelope::ResponseEnvelope;
pub use methods::{ShippingMethod, find_shipping_method};
pub use transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Authentication,
    Rates,
    Labels,
    Timings,
    Pickups,
    BillsOfLading,
    Loads,
    Tracking,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Rates => "rates",
            Self::Labels => "labels",
            Self::Timings => "timings",
            Self::Pickups => "pickups",
            Self::BillsOfLading => "bills_of_lading",
            Self::Loads => "loads",
            Self::Tracking => "tracking",
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One carrier capability: build the wire request, read the wire response.
///
/// `serialize` performs no I/O and cannot fail: options were validated when
/// they were built. Calling it twice with the same arguments yields equal
/// requests.
pub trait Operation {
    type Input: ?Sized;
    type Options: ?Sized;
    type Output;

    const CARRIER: &'static str;
    const CAPABILITY: Capability;

    fn serialize(&self, input: &Self::Input, options: &Self::Options) -> Request;

    fn parse(&self, request: &Request, response: &Response) -> ApiResult<Self::Output>;

    /// How this carrier phrases errors in a failed response body.
    fn message_extractor(&self) -> &dyn MessageExtractor;
}

/// Runs one request/response round trip. No retries.
pub fn execute<O, T>(
    operation: &O,
    transport: &T,
    input: &O::Input,
    options: &O::Options,
) -> ApiResult<O::Output>
where
    O: Operation,
    T: Transport + ?Sized,
{
    let request = operation.serialize(input, options);
    debug!(
        carrier = O::CARRIER,
        capability = %O::CAPABILITY,
        method = request.http_method.as_str(),
        url = %request.url,
        "sending carrier request"
    );

    let result = match transport.send(&request) {
        Ok(response) => {
            debug!(
                carrier = O::CARRIER,
                capability = %O::CAPABILITY,
                status = response.status,
                "received carrier response"
            );
            operation.parse(&request, &response)
        }
        Err(cause) => {
            let response = cause.response().cloned();
            let error = ApiError::transport(cause, operation.message_extractor());
            Err(ApiOutcome::new(error, request, response))
        }
    };

    if let Err(failure) = &result {
        warn!(
            carrier = O::CARRIER,
            capability = %O::CAPABILITY,
            kind = failure.data.kind().as_str(),
            error = %failure.data,
            "carrier operation failed"
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::{ApiErrorKind, PlainMessage, TransportError};

    struct Echo;

    impl Operation for Echo {
        type Input = str;
        type Options = ();
        type Output = String;

        const CARRIER: &'static str = "echo";
        const CAPABILITY: Capability = Capability::Tracking;

        fn serialize(&self, input: &str, _options: &()) -> Request {
            Request::get(format!("https://echo.test/{input}"))
        }

        fn parse(&self, request: &Request, response: &Response) -> ApiResult<String> {
            Ok(ApiOutcome::from_exchange(
                response.body.clone(),
                request,
                response,
            ))
        }

        fn message_extractor(&self) -> &dyn MessageExtractor {
            const PLAIN: PlainMessage = PlainMessage { pointer: None };
            &PLAIN
        }
    }

    struct Scripted {
        reply: Result<Response, TransportError>,
        seen: Mutex<Vec<String>>,
    }

    impl Transport for Scripted {
        fn send(&self, request: &Request) -> Result<Response, TransportError> {
            self.seen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(request.url.clone());
            self.reply.clone()
        }
    }

    #[test]
    fn successful_round_trip_parses_the_response() {
        let transport = Scripted {
            reply: Ok(Response::new(200, "in transit")),
            seen: Mutex::new(Vec::new()),
        };
        let outcome = execute(&Echo, &transport, "1Z999", &()).expect("success");
        assert_eq!(outcome.data, "in transit");
        assert_eq!(outcome.request().url, "https://echo.test/1Z999");
        assert_eq!(
            transport.seen.lock().expect("lock").as_slice(),
            ["https://echo.test/1Z999".to_string()]
        );
    }

    #[test]
    fn transport_failure_is_returned_as_failure_with_request() {
        let transport = Scripted {
            reply: Err(TransportError::Connection("connection reset".to_string())),
            seen: Mutex::new(Vec::new()),
        };
        let failure = execute(&Echo, &transport, "1Z999", &()).expect_err("failure");
        assert_eq!(failure.data.kind(), ApiErrorKind::Transport);
        assert_eq!(failure.data.message(), "connection failed: connection reset");
        assert_eq!(failure.request().url, "https://echo.test/1Z999");
        assert!(failure.response().is_none());
    }

    #[test]
    fn http_failure_keeps_response_and_extracted_message() {
        let transport = Scripted {
            reply: Err(TransportError::Http {
                response: Response::new(400, "tracking number not found"),
            }),
            seen: Mutex::new(Vec::new()),
        };
        let failure = execute(&Echo, &transport, "nope", &()).expect_err("failure");
        assert_eq!(failure.data.kind(), ApiErrorKind::Business);
        assert_eq!(failure.data.message(), "tracking number not found");
        assert_eq!(failure.response().map(|response| response.status), Some(400));
    }
}
