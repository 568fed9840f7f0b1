use super::{Error, ResponseTransaction};
use crate::{ASCOMError, ASCOMErrorCode, ASCOMResult};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Standard Alpaca response object.
///
/// `Value` is omitted for operations that don't produce one and for errors.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope {
    #[serde(flatten)]
    transaction: ResponseTransaction,
    #[serde(flatten)]
    error: ASCOMError,
    #[serde(rename = "Value")]
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
}

impl Envelope {
    pub(crate) fn new(
        transaction: ResponseTransaction,
        result: ASCOMResult<serde_json::Value>,
    ) -> Self {
        match result {
            Ok(value) => Self {
                transaction,
                error: ASCOMError::OK,
                value: (!value.is_null()).then_some(value),
            },
            Err(error) => Self {
                transaction,
                error,
                value: None,
            },
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Turn the outcome of a transaction into an HTTP response.
pub(crate) fn into_axum(
    transaction: ResponseTransaction,
    result: super::Result<serde_json::Value>,
) -> Response {
    match result {
        Ok(value) => {
            tracing::debug!("Alpaca request succeeded");
            Envelope::new(transaction, Ok(value)).into_response()
        }
        Err(Error::Ascom(error)) => {
            if matches!(
                error.code,
                ASCOMErrorCode::NOT_IMPLEMENTED | ASCOMErrorCode::ACTION_NOT_IMPLEMENTED
            ) {
                tracing::warn!("Alpaca method is not implemented");
            } else {
                tracing::error!(%error, "Alpaca method returned an error");
            }
            Envelope::new(transaction, Err(error)).into_response()
        }
        Err(
            err @ (Error::InvalidTransaction
            | Error::MissingParameter { .. }
            | Error::BadParameter { .. }
            | Error::MalformedParameters(_)),
        ) => (
            StatusCode::BAD_REQUEST,
            Envelope::new(transaction, Err(ASCOMError::invalid_value(&err))),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
