use chrono::{DateTime, Utc};
use serde_json::json;

use crate::adapter::{Capability, Operation, ResponseEnvelope};
use crate::auth::AccessToken;
use crate::error::{ApiError, MessageExtractor};
use crate::outcome::{ApiResult, Request, Response};

use super::{CARRIER_CODE, FAULT_MESSAGES, ParcelCredentials};

const ROOT: &str = "token";

/// Client-credentials exchange for a bearer token.
#[derive(Debug, Clone, Copy)]
pub struct RequestToken<'a> {
    credentials: &'a ParcelCredentials,
}

impl<'a> RequestToken<'a> {
    #[must_use]
    pub const fn new(credentials: &'a ParcelCredentials) -> Self {
        Self { credentials }
    }
}

impl Operation for RequestToken<'_> {
    type Input = ();
    type Options = ();
    type Output = AccessToken;

    const CARRIER: &'static str = CARRIER_CODE;
    const CAPABILITY: Capability = Capability::Authentication;

    fn serialize(&self, _input: &(), _options: &()) -> Request {
        let body = json!({
            "grantType": "client_credentials",
            "clientId": self.credentials.client_id,
            "clientSecret": self.credentials.client_secret,
        });
        Request::post_json(self.credentials.endpoint("security/v1/oauth/token"), &body)
    }

    fn parse(&self, request: &Request, response: &Response) -> ApiResult<AccessToken> {
        let envelope = ResponseEnvelope::open(request, response, ROOT, &FAULT_MESSAGES)?;
        let value = envelope.field::<String>("/accessToken")?;
        let expires_in = envelope.field::<u64>("/expiresIn")?;
        // Milliseconds since the epoch; a carrier that omits it issued the
        // token just now.
        let issued_at = match envelope.optional::<i64>("/issuedAt")? {
            Some(millis) => DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                envelope.failure(ApiError::decode(
                    "/issuedAt",
                    format!("{millis} is out of range"),
                ))
            })?,
            None => Utc::now(),
        };
        envelope.succeed(AccessToken::new(value, issued_at, expires_in))
    }

    fn message_extractor(&self) -> &dyn MessageExtractor {
        &FAULT_MESSAGES
    }
}
