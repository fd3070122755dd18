//! Checksum calculation for package verification
//!
//! Checksums are lowercase hex SHA-256, the same form the copy step records.

use crate::domain::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Calculate the SHA-256 checksum of a file, streaming it in chunks
///
/// # Examples
///
/// ```no_run
/// use photopack::core::verification::checksum::calculate_file_checksum;
///
/// let checksum = calculate_file_checksum("PHOTO/PIC/P0000001.JPG").unwrap();
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_file_checksum(path: impl AsRef<Path>) -> Result<String> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Calculate the SHA-256 checksum of raw bytes
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_calculate_checksum_bytes_known_value() {
        assert_eq!(
            calculate_checksum_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_file_checksum_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("P0000001.JPG");
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let checksum = calculate_file_checksum(&path).unwrap();
        assert_eq!(checksum, calculate_checksum_bytes(&data));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(calculate_file_checksum(dir.path().join("absent")).is_err());
    }
}
