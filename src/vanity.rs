//! Vanity-name resolution document.
//!
//! The endpoint answers `{"response": {"success": 1, "steamid": "..."}}` on a
//! match and `{"response": {"success": 42, "message": "No match"}}` otherwise.

use serde::Deserialize;

use crate::error::LookupError;
use crate::steamid::SteamId64;

#[derive(Debug, Deserialize)]
struct VanityDocument {
    response: VanityResponse,
}

#[derive(Debug, Deserialize)]
struct VanityResponse {
    success: i64,
    steamid: Option<String>,
    message: Option<String>,
}

/// Decode a 200 vanity-resolution body.
pub fn parse_vanity(status: u16, body: &str) -> Result<SteamId64, LookupError> {
    let document: VanityDocument =
        serde_json::from_str(body).map_err(|e| LookupError::malformed(status, e))?;
    let response = document.response;

    if response.success != 1 {
        return Err(LookupError::VanityNotFound {
            code: response.success,
            message: response.message.unwrap_or_else(|| "No match".to_string()),
        });
    }

    let steamid = response
        .steamid
        .ok_or_else(|| LookupError::malformed(status, "success without steamid"))?;
    SteamId64::parse(&steamid)
        .map_err(|_| LookupError::malformed(status, format!("invalid steamid '{steamid}'")))
}
