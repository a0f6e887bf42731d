pub mod email;
pub mod encryption;

pub use email::EmailService;
pub use encryption::EncryptionService;
