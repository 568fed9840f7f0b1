use super::params::{Method, method_not_allowed};
use crate::ASCOMError;
use crate::api::DeviceType;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("Unknown device type {0:?}")]
    UnknownDeviceType(String),
    #[error("Device {ty}[{device_number}] not found")]
    UnknownDeviceNumber {
        ty: DeviceType,
        device_number: String,
    },
    #[error("Unknown action {device_type}::{action}")]
    UnknownAction {
        device_type: DeviceType,
        action: String,
    },
    #[error("Action {device_type}::{action} doesn't accept {method}")]
    MethodNotAllowed {
        device_type: DeviceType,
        action: String,
        method: Method,
    },
    #[error("Invalid ClientID or ClientTransactionID")]
    InvalidTransaction,
    #[error("Missing or invalid required parameter: {name}")]
    MissingParameter { name: &'static str },
    #[error("Missing or invalid required parameter: {name}")]
    BadParameter { name: &'static str },
    #[error("Malformed request parameters: {0}")]
    MalformedParameters(#[from] serde_urlencoded::de::Error),
    #[error("Couldn't serialize the response: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Ascom(#[from] ASCOMError),
}

/// Plain responses for errors that never reach a device.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::UnknownDeviceType(_)
            | Self::UnknownDeviceNumber { .. }
            | Self::UnknownAction { .. } => {
                tracing::warn!(err = %self, "Request for an unknown resource");
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            Self::MethodNotAllowed { .. } => {
                tracing::warn!(err = %self, "Wrong HTTP method");
                method_not_allowed()
            }
            _ => {
                tracing::error!(err = %self, "Unexpected server error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
