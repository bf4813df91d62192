use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, MessageExtractor};
use crate::outcome::{ApiOutcome, ApiResult, Request, Response};

/// A response that passed the envelope check and is ready for field decoding.
///
/// Parsing is two-stage. [`ResponseEnvelope::open`] checks HTTP success, that
/// the body is JSON, and that the expected root marker is present; any
/// failure there returns before a single field is read. The decode methods
/// then name the field that could not be read.
#[derive(Debug)]
pub struct ResponseEnvelope<'a> {
    request: &'a Request,
    response: &'a Response,
    root: Value,
}

impl<'a> ResponseEnvelope<'a> {
    pub fn open(
        request: &'a Request,
        response: &'a Response,
        marker: &str,
        extractor: &dyn MessageExtractor,
    ) -> Result<Self, ApiOutcome<ApiError>> {
        let fail = |error: ApiError| ApiOutcome::from_exchange(error, request, response);

        if !response.is_success() {
            let error = match extractor.extract_message(response) {
                Some(message) => ApiError::business(message),
                None => ApiError::response_shape(format!(
                    "carrier responded with status {}",
                    response.status
                )),
            };
            return Err(fail(error));
        }

        let mut document = serde_json::from_str::<Value>(&response.body).map_err(|err| {
            fail(ApiError::response_shape(format!(
                "response body is not JSON: {err}"
            )))
        })?;

        match document.get_mut(marker).map(Value::take) {
            Some(root) if !root.is_null() => Ok(Self {
                request,
                response,
                root,
            }),
            _ => {
                let error = match extractor.extract_message(response) {
                    Some(message) => ApiError::business(message),
                    None => ApiError::response_shape(format!(
                        "response is missing the {marker:?} root"
                    )),
                };
                Err(fail(error))
            }
        }
    }

    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    /// Decodes the whole root into `T`; serde's message names the field.
    pub fn decode<T: DeserializeOwned>(&self, label: &str) -> Result<T, ApiOutcome<ApiError>> {
        T::deserialize(&self.root).map_err(|err| self.failure(ApiError::decode(label, err)))
    }

    /// Decodes a required value at a JSON pointer below the root.
    pub fn field<T: DeserializeOwned>(&self, pointer: &str) -> Result<T, ApiOutcome<ApiError>> {
        match self.root.pointer(pointer) {
            Some(value) if !value.is_null() => T::deserialize(value)
                .map_err(|err| self.failure(ApiError::decode(pointer, err))),
            _ => Err(self.failure(ApiError::decode(pointer, "field is missing"))),
        }
    }

    /// Like [`Self::field`], but absence is `None` rather than a failure.
    pub fn optional<T: DeserializeOwned>(
        &self,
        pointer: &str,
    ) -> Result<Option<T>, ApiOutcome<ApiError>> {
        match self.root.pointer(pointer) {
            Some(value) if !value.is_null() => T::deserialize(value)
                .map(Some)
                .map_err(|err| self.failure(ApiError::decode(pointer, err))),
            _ => Ok(None),
        }
    }

    /// Length of an optional array below the root; absence counts as empty.
    pub fn array_len(&self, pointer: &str) -> Result<usize, ApiOutcome<ApiError>> {
        match self.root.pointer(pointer) {
            None | Some(Value::Null) => Ok(0),
            Some(Value::Array(values)) => Ok(values.len()),
            Some(_) => Err(self.failure(ApiError::decode(pointer, "expected an array"))),
        }
    }

    #[must_use]
    pub fn failure(&self, error: ApiError) -> ApiOutcome<ApiError> {
        ApiOutcome::from_exchange(error, self.request, self.response)
    }

    pub fn succeed<T>(&self, data: T) -> ApiResult<T> {
        Ok(ApiOutcome::from_exchange(data, self.request, self.response))
    }
}
