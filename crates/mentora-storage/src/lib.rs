//! Blob storage: a narrow trait over object storage plus the S3 and local
//! filesystem backends.
//!
//! **Key format:** every stored object lives under a per-user namespace,
//! `{user_id}/{uuid4}.{ext}` — see [`keys`]. Keys are unique per upload and
//! never reused.

pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

pub use local::LocalStorage;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
