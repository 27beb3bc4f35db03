use crate::core::error::Error;

/// Bcrypt embeds its own salt and cost factor, so the stored hash is all
/// verification needs.
pub(crate) fn hash(plaintext: &str) -> Result<String, Error> {
    bcrypt::hash(plaintext, bcrypt::DEFAULT_COST).map_err(Error::Bcrypt)
}

pub(crate) fn verify(plaintext: &str, hash: &str) -> Result<bool, Error> {
    bcrypt::verify(plaintext, hash).map_err(Error::Bcrypt)
}
