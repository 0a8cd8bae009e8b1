//! Single-line share strings for copying levels through the clipboard.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use propeller_core::LevelSnapshot;
use thiserror::Error;

const SHARE_DOMAIN: &str = "propeller";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const SHARE_HEADER: &str = "propeller:v1";
/// Delimiter used to separate the prefix, version and payload.
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while encoding or decoding share strings.
#[derive(Debug, Error)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("share string was empty")]
    EmptyPayload,
    /// The encoded level did not contain a version segment.
    #[error("share string is missing the version")]
    MissingVersion,
    /// The encoded level did not include the payload segment.
    #[error("share string is missing the payload")]
    MissingPayload,
    /// The encoded level used an unexpected prefix segment.
    #[error("share prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded level used an unsupported version identifier.
    #[error("share version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode share payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be converted to or from JSON.
    #[error("could not convert share payload")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Encodes the level into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(snapshot: &LevelSnapshot) -> Result<String, LevelTransferError> {
    let json = serde_json::to_vec(snapshot).map_err(LevelTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{SHARE_HEADER}{FIELD_DELIMITER}{encoded}"))
}

/// Decodes a level from its share string.
///
/// The decoded level is not validated; loading it into the world does that.
pub(crate) fn decode(value: &str) -> Result<LevelSnapshot, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let domain = parts.next().unwrap_or_default();
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != SHARE_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SHARE_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)
}
