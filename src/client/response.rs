//! Status classification and JSON decoding for API responses.

// crates.io
use ::http::StatusCode;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::TransientError,
	http::{ApiResponse, ResponseMetadata},
};

#[derive(Deserialize)]
struct ErrorBody {
	message: Option<String>,
}

/// Passes 2xx responses through and maps every other status onto [`Error`].
pub fn ensure_success(response: ApiResponse) -> Result<ApiResponse> {
	let status = response.status();

	if status.is_success() {
		return Ok(response);
	}

	let message = error_message(&response).unwrap_or_else(|| canonical_reason(status));

	Err(match status {
		StatusCode::UNAUTHORIZED => Error::Unauthorized { message },
		StatusCode::NOT_FOUND => Error::NotFound { message },
		_ if status.is_client_error() => Error::Rejected { status: status.as_u16(), message },
		_ => {
			let meta = ResponseMetadata::from_response(&response);

			TransientError::Api { message, status: meta.status, retry_after: meta.retry_after }
				.into()
		},
	})
}

/// Decodes a JSON body, reporting the path of the first mismatch.
pub fn decode_json<T>(response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		TransientError::ResponseParse { source, status: Some(response.status().as_u16()) }.into()
	})
}

/// Extracts the server's `{"message": ...}` text, falling back to a plain-text body.
pub fn error_message(response: &ApiResponse) -> Option<String> {
	let body = response.body();

	if let Ok(ErrorBody { message: Some(message) }) = serde_json::from_slice::<ErrorBody>(body) {
		return Some(message).filter(|m| !m.trim().is_empty());
	}

	let text = String::from_utf8_lossy(body);
	let text = text.trim();

	if text.is_empty() || text.starts_with('{') { None } else { Some(text.to_owned()) }
}

fn canonical_reason(status: StatusCode) -> String {
	status.canonical_reason().unwrap_or("unexpected status").to_owned()
}
