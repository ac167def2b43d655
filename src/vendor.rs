// ABOUTME: Vendor response envelope parsing and normalization
// ABOUTME: Maps the controller's {errorCode, result, msg} wrapper to the (data, errorCode) contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The controller wraps every JSON response in a uniform envelope:
//! `{errorCode: int, result: any, msg: string}` with `errorCode == 0` meaning
//! success. Two non-zero codes are distinguished and drive control flow; all
//! others are reported verbatim to the caller.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved sentinel for "no usable response": transport failure or a body
/// that was not the expected JSON envelope. Distinct from every vendor code.
pub const NO_RESPONSE: i64 = -1;

/// The closed set of vendor error codes the gateway reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorCode {
    Success,
    /// Access token expired; eligible for exactly one refresh-and-retry pass.
    TokenExpired,
    /// Endpoint only accepts authorization-code-mode tokens; surfaced
    /// verbatim, never retried.
    AuthCodeModeRequired,
    /// Any other vendor code, passed through untouched.
    Other(i64),
}

impl VendorCode {
    const TOKEN_EXPIRED: i64 = -44112;
    const AUTH_CODE_MODE_REQUIRED: i64 = -44118;

    #[must_use]
    pub const fn from_raw(code: i64) -> Self {
        match code {
            0 => Self::Success,
            Self::TOKEN_EXPIRED => Self::TokenExpired,
            Self::AUTH_CODE_MODE_REQUIRED => Self::AuthCodeModeRequired,
            other => Self::Other(other),
        }
    }
}

/// The controller's uniform response wrapper, as received on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub error_code: i64,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Envelope {
    #[must_use]
    pub const fn code(&self) -> VendorCode {
        VendorCode::from_raw(self.error_code)
    }

    /// Vendor message, or a placeholder when the controller omitted one.
    #[must_use]
    pub fn message(&self) -> String {
        self.msg.clone().unwrap_or_else(|| "unknown error".into())
    }
}

/// A controller response normalized to the `(data, errorCode)` contract:
/// success carries the `result` payload, a vendor rejection carries the full
/// error payload (so callers can extract `msg`), and [`NO_RESPONSE`] carries
/// nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub data: Option<Value>,
    pub error_code: i64,
}

impl ApiResponse {
    #[must_use]
    pub const fn success(data: Value) -> Self {
        Self {
            data: Some(data),
            error_code: 0,
        }
    }

    /// Success with an empty object payload, for endpoints that omit a body.
    #[must_use]
    pub fn empty_success() -> Self {
        Self::success(Value::Object(serde_json::Map::new()))
    }

    /// Transport failure or malformed body: no data, sentinel code.
    #[must_use]
    pub const fn no_response() -> Self {
        Self {
            data: None,
            error_code: NO_RESPONSE,
        }
    }

    /// Normalize a raw controller response.
    ///
    /// An empty body on a 2xx status is a success with an empty payload (the
    /// controller omits the JSON body on delete). Anything that is not the
    /// expected envelope maps to [`ApiResponse::no_response`].
    #[must_use]
    pub fn from_http(status: StatusCode, body: &[u8]) -> Self {
        let trimmed: &[u8] = {
            let s = body;
            let start = s.iter().position(|b| !b.is_ascii_whitespace());
            start.map_or(&[][..], |i| &s[i..])
        };
        if trimmed.is_empty() {
            return if status.is_success() {
                Self::empty_success()
            } else {
                Self::no_response()
            };
        }
        let Ok(raw) = serde_json::from_slice::<Value>(body) else {
            return Self::no_response();
        };
        let Some(code) = raw.get("errorCode").and_then(Value::as_i64) else {
            return Self::no_response();
        };
        if code == 0 {
            Self {
                data: Some(raw.get("result").cloned().unwrap_or(Value::Null)),
                error_code: 0,
            }
        } else {
            Self {
                data: Some(raw),
                error_code: code,
            }
        }
    }

    #[must_use]
    pub const fn code(&self) -> VendorCode {
        VendorCode::from_raw(self.error_code)
    }

    /// Vendor `msg` field from an error payload, when present.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.get("msg"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn distinguished_codes_map_to_variants() {
        assert_eq!(VendorCode::from_raw(0), VendorCode::Success);
        assert_eq!(VendorCode::from_raw(-44112), VendorCode::TokenExpired);
        assert_eq!(
            VendorCode::from_raw(-44118),
            VendorCode::AuthCodeModeRequired
        );
        assert_eq!(VendorCode::from_raw(-1005), VendorCode::Other(-1005));
    }

    #[test]
    fn success_envelope_yields_result_payload() {
        let body = json!({"errorCode": 0, "result": {"users": [], "totalRows": 42}, "msg": "Success."});
        let resp = ApiResponse::from_http(StatusCode::OK, body.to_string().as_bytes());
        assert_eq!(resp.error_code, 0);
        assert_eq!(resp.data, Some(json!({"users": [], "totalRows": 42})));
    }

    #[test]
    fn vendor_error_keeps_full_payload() {
        let body = json!({"errorCode": -33004, "msg": "The user already exists."});
        let resp = ApiResponse::from_http(StatusCode::OK, body.to_string().as_bytes());
        assert_eq!(resp.error_code, -33004);
        assert_eq!(resp.message(), Some("The user already exists."));
    }

    #[test]
    fn empty_body_on_success_status_is_empty_success() {
        let resp = ApiResponse::from_http(StatusCode::OK, b"");
        assert_eq!(resp, ApiResponse::empty_success());
        let resp = ApiResponse::from_http(StatusCode::NO_CONTENT, b"  ");
        assert_eq!(resp, ApiResponse::empty_success());
    }

    #[test]
    fn empty_body_on_error_status_is_no_response() {
        let resp = ApiResponse::from_http(StatusCode::BAD_GATEWAY, b"");
        assert_eq!(resp, ApiResponse::no_response());
    }

    #[test]
    fn malformed_body_is_no_response() {
        let resp = ApiResponse::from_http(StatusCode::OK, b"<html>nope</html>");
        assert_eq!(resp, ApiResponse::no_response());
        assert_eq!(resp.error_code, NO_RESPONSE);

        // JSON but not the envelope
        let resp = ApiResponse::from_http(StatusCode::OK, b"{\"ok\": true}");
        assert_eq!(resp, ApiResponse::no_response());
    }

    #[test]
    fn success_without_result_field_is_null_data() {
        let resp = ApiResponse::from_http(StatusCode::OK, b"{\"errorCode\": 0}");
        assert_eq!(resp.error_code, 0);
        assert_eq!(resp.data, Some(Value::Null));
    }
}
