/// Authorization policy
///
/// Checks run after authentication has established who the caller is (or,
/// for the payment webhook, which shared key it presented).

use sha2::{Digest, Sha256};

use crate::error::{AppError, AuthError};
use crate::store::{Chirp, UserId};

/// Only the author may remove a chirp
pub fn ensure_chirp_owner(chirp: &Chirp, requester_id: UserId) -> Result<(), AppError> {
    if chirp.author_id != requester_id {
        tracing::warn!(
            chirp_id = %chirp.id,
            requester_id = %requester_id,
            "Attempt to modify a chirp owned by another user"
        );
        return Err(AuthError::Forbidden.into());
    }
    Ok(())
}

/// Tier upgrades are reserved to the payment provider holding the API key.
///
/// Digests are compared so the comparison time does not depend on where the
/// keys first differ.
pub fn ensure_webhook_key(presented: &str, expected: &str) -> Result<(), AppError> {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    let difference = presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));

    if difference != 0 {
        return Err(AuthError::InvalidApiKey.into());
    }
    Ok(())
}
