//! `OpenDAL` operator construction.

use opendal::{Operator, services};

use coinkeeper_shared::config::StorageProvider;

use crate::error::StorageError;

/// Create an `OpenDAL` operator from provider config.
///
/// # Errors
///
/// Returns an error if the provider settings are rejected by `OpenDAL`.
pub fn build_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
    match provider {
        StorageProvider::Fs { root } => {
            let root = root
                .to_str()
                .ok_or_else(|| StorageError::configuration("storage root is not valid UTF-8"))?;
            let builder = services::Fs::default()
                .root(root)
                .atomic_write_dir(&format!("{}/.tmp", root.trim_end_matches('/')));
            Ok(Operator::new(builder)?.finish())
        }
        StorageProvider::Memory => Ok(Operator::new(services::Memory::default())?.finish()),
        StorageProvider::S3 {
            bucket,
            region,
            endpoint,
            access_key_id,
            secret_access_key,
        } => {
            if bucket.trim().is_empty() {
                return Err(StorageError::configuration("s3 bucket must not be empty"));
            }
            let mut builder = services::S3::default().bucket(bucket).region(region);
            if let Some(endpoint) = endpoint {
                builder = builder.endpoint(endpoint);
            }
            if let Some(key) = access_key_id {
                builder = builder.access_key_id(key);
            }
            if let Some(secret) = secret_access_key {
                builder = builder.secret_access_key(secret);
            }
            Ok(Operator::new(builder)?.finish())
        }
    }
}
