//! Response envelope for medicine operations.
//!
//! Every operation answers HTTP 200 with `{"status": "success" | "fail", ...}`.
//! The status field, not the transport status, tells the client whether the
//! operation worked.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::MedicineId;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
}

/// Successful operation payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<MedicineId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<T>,
}

impl Envelope {
    /// Acknowledge an operation with a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: Some(message.into()),
            id: None,
            rows: None,
        }
    }

    /// Failure payload with a client-facing message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            message: Some(message.into()),
            id: None,
            rows: None,
        }
    }

    pub fn with_id(mut self, id: MedicineId) -> Self {
        self.id = Some(id);
        self
    }
}

impl<T: Serialize> Envelope<T> {
    /// Return records.
    pub fn rows(rows: T) -> Self {
        Self {
            status: Status::Success,
            message: None,
            id: None,
            rows: Some(rows),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// An operation failure, rendered as a `fail` envelope.
#[derive(Debug)]
pub struct Fail(pub Error);

impl From<Error> for Fail {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for Fail {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Validation(rejection.body_text()))
    }
}

impl IntoResponse for Fail {
    fn into_response(self) -> Response {
        Envelope::fail(self.0.client_message()).into_response()
    }
}

/// Result type of medicine operation handlers.
pub type OpResult<T = ()> = std::result::Result<Envelope<T>, Fail>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_envelope_shape() {
        let id = MedicineId::new(3).unwrap();
        let envelope = Envelope::message("Medicine added successfully").with_id(id);
        let value = serde_json::to_value(envelope).unwrap();
        assert_eq!(
            value,
            json!({"status": "success", "message": "Medicine added successfully", "id": 3})
        );
    }

    #[test]
    fn test_rows_envelope_shape() {
        let value = serde_json::to_value(Envelope::rows(vec![1, 2])).unwrap();
        assert_eq!(value, json!({"status": "success", "rows": [1, 2]}));
    }

    #[test]
    fn test_fail_is_http_ok() {
        let response = Fail(Error::NotFound("Medicine not found".into())).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
