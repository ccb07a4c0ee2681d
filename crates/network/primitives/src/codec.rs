use nearby_primitives::profile::ProfileRecord;
use thiserror::Error;

/// Literal payload asking a publisher for its profile.
pub const REQUEST_PROFILE: &[u8] = b"REQUEST_PROFILE";

#[derive(Debug, Error)]
#[error("failed to encode profile record")]
pub struct EncodeError(#[source] serde_json::Error);

#[derive(Debug, Error)]
#[error("malformed profile payload")]
pub struct DecodeError(#[source] serde_json::Error);

/// JSON wire format for profile records.
///
/// Field order follows the record definition, so encoding the same record
/// always yields the same bytes.
#[derive(Clone, Copy, Debug)]
pub struct ExchangeCodec;

impl ExchangeCodec {
    pub fn encode(record: &ProfileRecord) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_vec(record).map_err(EncodeError)
    }

    pub fn decode(bytes: &[u8]) -> Result<ProfileRecord, DecodeError> {
        serde_json::from_slice(bytes).map_err(DecodeError)
    }

    #[must_use]
    pub fn is_profile_request(payload: &[u8]) -> bool {
        payload == REQUEST_PROFILE
    }
}
