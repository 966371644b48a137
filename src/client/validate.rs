//! Response classification and body decoding.
//!
//! Accepted statuses:
//! - creation: 200, 201
//! - get/list: 200
//! - deletion: 200, 202, 204

use serde::de::DeserializeOwned;

use super::{ApiResponse, ClientResult};
use crate::error::{KldError, Result};

const CREATION_OK: &[u16] = &[200, 201];
const GET_OK: &[u16] = &[200];
const DELETION_OK: &[u16] = &[200, 202, 204];

/// Error bodies are echoed into messages, capped at this many characters
const MAX_ERROR_BODY_CHARS: usize = 200;

pub fn validate_creation_response(res: ClientResult, kind: &'static str) -> Result<ApiResponse> {
    validate(res, kind, "create", CREATION_OK)
}

pub fn validate_get_response(res: ClientResult, kind: &'static str) -> Result<ApiResponse> {
    validate(res, kind, "get", GET_OK)
}

pub fn validate_deletion_response(res: ClientResult, kind: &'static str) -> Result<ApiResponse> {
    validate(res, kind, "delete", DELETION_OK)
}

fn validate(
    res: ClientResult,
    kind: &'static str,
    action: &'static str,
    accepted: &[u16],
) -> Result<ApiResponse> {
    let res = res.map_err(|e| KldError::Transport {
        kind,
        action,
        message: e.0,
    })?;

    if !accepted.contains(&res.status) {
        return Err(KldError::Remote {
            kind,
            action,
            status: res.status,
            body: res.body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    Ok(res)
}

/// Decode a validated response body
pub fn decode<T: DeserializeOwned>(res: &ApiResponse, kind: &'static str) -> Result<T> {
    serde_json::from_str(&res.body).map_err(|source| KldError::Decode { kind, source })
}
