//! Fetching and verifying artifacts

pub mod checksum;
pub mod error;
pub mod fetcher;

pub use checksum::{DigestAlgorithm, ExpectedChecksum, digest_file, verify, verify_size};
pub use error::FetchError;
pub use fetcher::DefaultFetcher;

use std::path::Path;

use url::Url;

/// Interpret a configured source as a URI
///
/// Anything that does not parse as an absolute URI with a scheme of two or
/// more letters is taken as a file system path (so `C:\x` stays a path),
/// resolved against the current directory when relative.
pub fn source_uri(source: &str) -> Result<Url, FetchError> {
    if let Ok(uri) = Url::parse(source)
        && uri.scheme().len() > 1
    {
        return Ok(uri);
    }
    let path = Path::new(source);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Url::from_file_path(&absolute).map_err(|_| FetchError::InvalidSource(source.to_string()))
}
