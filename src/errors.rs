use serde::Serialize;
use std::borrow::Cow;
use std::fmt::{self, Debug, Display};
use thiserror::Error;

/// Numeric ASCOM error code as sent in the `ErrorNumber` field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ASCOMErrorCode(u16);

/// First code reserved for protocol errors.
const BASE: u16 = 0x400;
/// First code reserved for driver-specific errors.
const DRIVER_BASE: u16 = 0x500;
/// Last valid error code.
const MAX: u16 = 0xFFF;

impl TryFrom<u16> for ASCOMErrorCode {
    type Error = eyre::Error;

    fn try_from(raw: u16) -> eyre::Result<Self> {
        eyre::ensure!(
            raw == 0 || (BASE..=MAX).contains(&raw),
            "Error code {raw:#X} is outside of the ASCOM range {BASE:#X}..={MAX:#X}",
        );
        Ok(Self(raw))
    }
}

impl ASCOMErrorCode {
    /// Build an error code from a zero-based driver-specific number.
    ///
    /// Panics if `driver_code` doesn't fit into the driver range (0..=0xAFF).
    ///
    /// ```
    /// use alpaca_observatory::{ASCOMError, ASCOMErrorCode};
    ///
    /// const MOTOR_STALLED: ASCOMErrorCode = ASCOMErrorCode::new_for_driver(3);
    ///
    /// let err = ASCOMError::new(MOTOR_STALLED, "Focuser motor stalled");
    /// assert_eq!(err.code.raw(), 0x503);
    /// ```
    pub const fn new_for_driver(driver_code: u16) -> Self {
        assert!(
            driver_code <= MAX - DRIVER_BASE,
            "Driver error code is too large"
        );
        Self(DRIVER_BASE + driver_code)
    }

    /// Zero-based driver code if this is a driver-specific error, raw code otherwise.
    pub const fn as_driver_error(self) -> Result<u16, u16> {
        match self.0.checked_sub(DRIVER_BASE) {
            Some(driver_code) => Ok(driver_code),
            None => Err(self.0),
        }
    }

    /// Raw numeric value.
    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// An error reported inside the Alpaca response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("ASCOM error {code}: {message}")]
pub struct ASCOMError {
    /// Error number.
    #[serde(rename = "ErrorNumber")]
    pub code: ASCOMErrorCode,
    /// Error message.
    #[serde(rename = "ErrorMessage")]
    pub message: Cow<'static, str>,
}

impl ASCOMError {
    /// Create an error from a code and a message.
    pub fn new(code: ASCOMErrorCode, message: impl Display) -> Self {
        Self {
            code,
            message: message.to_string().into(),
        }
    }

    /// Whether this is the success placeholder.
    pub const fn is_ok(&self) -> bool {
        self.code.0 == 0
    }
}

/// Result type returned by every device operation.
pub type ASCOMResult<T = ()> = Result<T, ASCOMError>;

macro_rules! ascom_error_codes {
    ($(#[doc = $doc:literal] $name:ident = $value:literal,)*) => {
        impl ASCOMErrorCode {
            $(
                #[doc = $doc]
                pub const $name: Self = Self($value);
            )*
        }

        impl Debug for ASCOMErrorCode {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match *self {
                    $(
                        Self::$name => f.write_str(stringify!($name)),
                    )*
                    _ => match self.as_driver_error() {
                        Ok(driver_code) => write!(f, "DRIVER_ERROR[{driver_code}]"),
                        Err(raw_code) => write!(f, "{raw_code:#X}"),
                    },
                }
            }
        }

        impl ASCOMError {
            $(
                #[doc = $doc]
                pub const $name: Self = Self {
                    code: ASCOMErrorCode::$name,
                    message: Cow::Borrowed(ascom_error_codes!(@msg $name $doc)),
                };
            )*
        }
    };

    (@msg OK $doc:literal) => ("");
    (@msg $name:ident $doc:literal) => ($doc);
}

impl Display for ASCOMErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

ascom_error_codes! {
    #[doc = "Success"]
    OK = 0,
    #[doc = "Property or method not implemented"]
    NOT_IMPLEMENTED = 0x400,
    #[doc = "Invalid value"]
    INVALID_VALUE = 0x401,
    #[doc = "A value has not been set"]
    VALUE_NOT_SET = 0x402,
    #[doc = "The communications channel is not connected"]
    NOT_CONNECTED = 0x407,
    #[doc = "The attempted operation is invalid because the device is parked"]
    INVALID_WHILE_PARKED = 0x408,
    #[doc = "The attempted operation is invalid because the device is slaved"]
    INVALID_WHILE_SLAVED = 0x409,
    #[doc = "The requested operation can not be undertaken at this time"]
    INVALID_OPERATION = 0x40B,
    #[doc = "The requested action is not implemented in this driver"]
    ACTION_NOT_IMPLEMENTED = 0x40C,
}

impl ASCOMError {
    /// "Invalid value" error with a custom message.
    pub fn invalid_value(message: impl Display) -> Self {
        Self::new(ASCOMErrorCode::INVALID_VALUE, message)
    }

    /// "Invalid operation" error with a custom message.
    pub fn invalid_operation(message: impl Display) -> Self {
        Self::new(ASCOMErrorCode::INVALID_OPERATION, message)
    }
}
