//! Artifact checksums (SHA-256 / SHA-512)

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

use super::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "").as_str() {
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(format!("Unsupported digest algorithm: {}", s)),
        }
    }
}

impl TryFrom<String> for DigestAlgorithm {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DigestAlgorithm> for String {
    fn from(algorithm: DigestAlgorithm) -> Self {
        algorithm.as_str().to_string()
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest an artifact is expected to have
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedChecksum {
    pub algorithm: DigestAlgorithm,
    /// Lowercase hex
    pub digest: String,
}

impl ExpectedChecksum {
    pub fn new(algorithm: DigestAlgorithm, digest: impl AsRef<str>) -> Self {
        Self {
            algorithm,
            digest: digest.as_ref().trim().to_lowercase(),
        }
    }

    pub fn sha256(digest: impl AsRef<str>) -> Self {
        Self::new(DigestAlgorithm::Sha256, digest)
    }
}

/// Hex digest of a file's content
pub fn digest_file(path: &Path, algorithm: DigestAlgorithm) -> io::Result<String> {
    let mut file = File::open(path)?;
    Ok(match algorithm {
        DigestAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            io::copy(&mut file, &mut hasher)?;
            format!("{:x}", hasher.finalize())
        }
        DigestAlgorithm::Sha512 => {
            let mut hasher = Sha512::new();
            io::copy(&mut file, &mut hasher)?;
            format!("{:x}", hasher.finalize())
        }
    })
}

/// Check a file against an expected digest
pub fn verify(path: &Path, expected: &ExpectedChecksum) -> Result<(), FetchError> {
    let actual = digest_file(path, expected.algorithm)?;
    if actual != expected.digest {
        return Err(FetchError::ChecksumMismatch {
            expected: expected.digest.clone(),
            actual,
        });
    }
    Ok(())
}

/// Check a file's length
pub fn verify_size(path: &Path, expected: u64) -> Result<(), FetchError> {
    let actual = std::fs::metadata(path)?.len();
    if actual != expected {
        return Err(FetchError::SizeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn hello() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"hello").unwrap();
        file
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("SHA-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("sha512".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha512);
        assert!("MD5".parse::<DigestAlgorithm>().is_err());
        assert_eq!(DigestAlgorithm::Sha512.to_string(), "SHA-512");
    }

    #[test]
    fn test_digest_file() {
        let file = hello();
        assert_eq!(digest_file(file.path(), DigestAlgorithm::Sha256).unwrap(), HELLO_SHA256);
        assert_eq!(digest_file(file.path(), DigestAlgorithm::Sha512).unwrap().len(), 128);
    }

    #[test]
    fn test_verify() {
        let file = hello();
        assert!(verify(file.path(), &ExpectedChecksum::sha256(HELLO_SHA256.to_uppercase())).is_ok());

        let error = verify(file.path(), &ExpectedChecksum::sha256("00")).unwrap_err();
        assert!(error.is_verification_failure());
        assert!(verify_size(file.path(), 5).is_ok());
        assert!(verify_size(file.path(), 6).unwrap_err().is_verification_failure());
    }
}
