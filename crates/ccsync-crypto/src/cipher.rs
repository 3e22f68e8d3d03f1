//! Streaming encrypt/decrypt to a single recipient

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::iter;
use std::path::Path;

use age::x25519::{Identity, Recipient};
use tempfile::NamedTempFile;

use ccsync_fs::io::ensure_dir;

use crate::{Error, Result};

/// Encrypt everything read from `reader` to `recipient`, writing the age
/// container to `writer`. Returns the writer once the stream is finalised.
pub fn encrypt<R: Read, W: Write>(recipient: &Recipient, mut reader: R, writer: W) -> Result<W> {
    let recipients: Vec<Box<dyn age::Recipient + Send>> = vec![Box::new(recipient.clone())];
    let encryptor = age::Encryptor::with_recipients(recipients)
        .ok_or_else(|| Error::InvalidRecipient("no recipients".into()))?;

    let mut stream = encryptor.wrap_output(writer)?;
    io::copy(&mut reader, &mut stream)?;
    Ok(stream.finish()?)
}

/// Decrypt an age container read from `reader` with `identity`, writing the
/// plaintext to `writer`.
pub fn decrypt<R: Read, W: Write>(identity: &Identity, reader: R, mut writer: W) -> Result<W> {
    let decryptor = match age::Decryptor::new(reader)? {
        age::Decryptor::Recipients(d) => d,
        _ => return Err(Error::PassphraseProtected),
    };

    let mut stream = decryptor.decrypt(iter::once(identity as &dyn age::Identity))?;
    io::copy(&mut stream, &mut writer)?;
    writer.flush()?;
    Ok(writer)
}

/// In-memory [`encrypt`].
pub fn encrypt_bytes(recipient: &Recipient, plaintext: &[u8]) -> Result<Vec<u8>> {
    encrypt(recipient, plaintext, Vec::new())
}

/// In-memory [`decrypt`].
pub fn decrypt_bytes(identity: &Identity, ciphertext: &[u8]) -> Result<Vec<u8>> {
    decrypt(identity, ciphertext, Vec::new())
}

/// Encrypt the file at `src` into `dst`.
///
/// Output goes to a temporary sibling of `dst` which replaces `dst` only
/// once the stream is complete.
pub fn encrypt_file(recipient: &Recipient, src: &Path, dst: &Path) -> Result<()> {
    let input = BufReader::new(File::open(src)?);
    let temp = temp_sibling(dst)?;
    let temp = encrypt(recipient, input, temp)?;
    persist(temp, dst)
}

/// Decrypt the file at `src` into `dst`.
///
/// A failed decryption leaves `dst` untouched.
pub fn decrypt_file(identity: &Identity, src: &Path, dst: &Path) -> Result<()> {
    let input = BufReader::new(File::open(src)?);
    let temp = temp_sibling(dst)?;
    let temp = decrypt(identity, input, temp)?;
    persist(temp, dst)
}

fn temp_sibling(dst: &Path) -> Result<NamedTempFile> {
    let parent = match dst.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;
    Ok(NamedTempFile::new_in(parent)?)
}

fn persist(temp: NamedTempFile, dst: &Path) -> Result<()> {
    temp.as_file().sync_all()?;
    temp.persist(dst).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
