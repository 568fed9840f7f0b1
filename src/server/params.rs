use super::{Error, Result};
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{self, StatusCode};
use axum::response::IntoResponse;
use indexmap::IndexMap;

/// HTTP verb an Alpaca route is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum Method {
    #[display("GET")]
    Get,
    #[display("PUT")]
    Put,
}

/// Request parameters in the order they were sent.
///
/// Extraction removes parameters from the map, so whatever is left afterwards
/// was not consumed by the handler.
#[derive(Debug, Default)]
pub(crate) struct OpaqueParams(IndexMap<String, String>);

impl OpaqueParams {
    fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut map = IndexMap::new();
        for (name, value) in pairs {
            // The first occurrence of a repeated parameter wins.
            _ = map.entry(name).or_insert(value);
        }
        Self(map)
    }

    pub(crate) fn parse(encoded: &[u8]) -> std::result::Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(encoded).map(Self::from_pairs)
    }

    /// Add parameters that are not already present.
    fn merge_missing(&mut self, fallback: Self) {
        for (name, value) in fallback.0 {
            _ = self.0.entry(name).or_insert(value);
        }
    }

    pub(crate) fn take(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    /// Extract a required parameter, falling back to alternative names in order.
    pub(crate) fn extract<T: ASCOMParam>(
        &mut self,
        name: &'static str,
        aliases: &[&'static str],
    ) -> Result<T> {
        let Some(value) = std::iter::once(name)
            .chain(aliases.iter().copied())
            .find_map(|name| self.take(name))
        else {
            tracing::warn!(param = name, "Missing required parameter");
            return Err(Error::MissingParameter { name });
        };

        T::from_param(&value).ok_or_else(|| {
            tracing::warn!(param = name, value = %value, "Invalid value for parameter");
            Error::BadParameter { name }
        })
    }

    pub(crate) fn finish_extraction(self) {
        if !self.0.is_empty() {
            tracing::warn!(params = ?self.0, "Unused parameters");
        }
    }
}

/// Parameters of an Alpaca request together with the verb they came with.
#[derive(Debug)]
pub(crate) enum ActionParams {
    Get(OpaqueParams),
    Put(OpaqueParams),
}

impl ActionParams {
    pub(crate) const fn method(&self) -> Method {
        match self {
            Self::Get(_) => Method::Get,
            Self::Put(_) => Method::Put,
        }
    }

    pub(crate) const fn params_mut(&mut self) -> &mut OpaqueParams {
        match self {
            Self::Get(params) | Self::Put(params) => params,
        }
    }

    pub(crate) fn finish_extraction(self) {
        match self {
            Self::Get(params) | Self::Put(params) => params.finish_extraction(),
        }
    }
}

/// Parameters that couldn't be decoded at all.
///
/// No device has been resolved yet, so the envelope carries zero transaction IDs.
fn bad_encoding(err: serde_urlencoded::de::Error) -> axum::response::Response {
    tracing::warn!(%err, "Malformed request parameters");
    super::response::into_axum(
        super::ResponseTransaction {
            client_transaction_id: 0,
            server_transaction_id: 0,
        },
        Err(Error::MalformedParameters(err)),
    )
}

pub(crate) fn method_not_allowed() -> axum::response::Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        axum::Json(serde_json::json!({ "ErrorMessage": "Method Not Allowed" })),
    )
        .into_response()
}

impl<S: Send + Sync> FromRequest<S> for ActionParams {
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let query = OpaqueParams::parse(req.uri().query().unwrap_or_default().as_bytes())
            .map_err(bad_encoding)?;

        match *req.method() {
            http::Method::GET => Ok(Self::Get(query)),
            http::Method::PUT => {
                // The body is form-encoded whatever the declared content type is.
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                let mut params = OpaqueParams::parse(&body).map_err(bad_encoding)?;
                params.merge_missing(query);
                Ok(Self::Put(params))
            }
            _ => Err(method_not_allowed()),
        }
    }
}

/// A value that can be parsed from an Alpaca request parameter.
pub(crate) trait ASCOMParam: Sized {
    fn from_param(value: &str) -> Option<Self>;
}

/// String parameter that may be present but empty.
#[derive(Debug)]
pub(crate) struct AllowEmpty(pub(crate) String);

impl From<AllowEmpty> for String {
    fn from(value: AllowEmpty) -> Self {
        value.0
    }
}

impl ASCOMParam for AllowEmpty {
    fn from_param(value: &str) -> Option<Self> {
        Some(Self(value.to_owned()))
    }
}

impl ASCOMParam for String {
    fn from_param(value: &str) -> Option<Self> {
        (!value.is_empty()).then(|| value.to_owned())
    }
}

impl ASCOMParam for i32 {
    fn from_param(value: &str) -> Option<Self> {
        parse_int(value, false)
    }
}

impl ASCOMParam for f64 {
    fn from_param(value: &str) -> Option<Self> {
        parse_double(value, true)
    }
}

impl ASCOMParam for bool {
    fn from_param(value: &str) -> Option<Self> {
        parse_bool(value)
    }
}

fn strip_sign(value: &str, allow_sign: bool) -> &str {
    match value.strip_prefix(['+', '-']) {
        Some(rest) if allow_sign => rest,
        _ => value,
    }
}

/// Digits only, with an optional leading sign when `allow_sign` is set.
pub(crate) fn is_integer(value: &str, allow_sign: bool) -> bool {
    let digits = strip_sign(value, allow_sign);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Optional sign, digits with at most one dot, and at least one digit.
pub(crate) fn is_decimal(value: &str, allow_sign: bool) -> bool {
    let body = strip_sign(value, allow_sign);
    let mut seen_dot = false;
    let mut seen_digit = false;
    for b in body.bytes() {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

pub(crate) fn parse_int(value: &str, allow_sign: bool) -> Option<i32> {
    if !is_integer(value, allow_sign) {
        return None;
    }
    value.parse().ok()
}

pub(crate) fn parse_double(value: &str, allow_sign: bool) -> Option<f64> {
    if !is_decimal(value, allow_sign) {
        return None;
    }
    value.parse().ok()
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}
