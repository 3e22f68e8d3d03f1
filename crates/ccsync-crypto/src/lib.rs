//! Encryption collaborator for claude-code-sync
//!
//! Files are encrypted to a single age X25519 recipient. The private
//! identity lives in a key file in the sync-state directory; the public
//! recipient is read from its `# public key:` comment or derived from the
//! secret key.

pub mod cipher;
pub mod error;
pub mod key;

pub use age::x25519::{Identity, Recipient};
pub use cipher::{decrypt, decrypt_bytes, decrypt_file, encrypt, encrypt_bytes, encrypt_file};
pub use error::{Error, Result};
pub use key::{
    generate_identity, load_identity, parse_identity, parse_recipient, public_key_from_content,
    render_key_file, save_key_file, secret_key_line, validate_key_content,
};
