pub mod argon2;
pub mod errors;
pub mod hasher;

pub use self::argon2::PasswordHasher;
pub use errors::PasswordError;
pub use hasher::CredentialHasher;
