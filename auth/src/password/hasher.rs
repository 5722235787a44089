use super::errors::PasswordError;

/// One-way credential hashing.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Produce a salted hash of `plaintext`.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Check `plaintext` against a stored hash.
    ///
    /// Must compare in constant time and return false for a malformed hash.
    fn verify(&self, plaintext: &str, hashed: &str) -> bool;
}
