//! Storage key generation.

use mentora_core::models::UserId;
use uuid::Uuid;

const DEFAULT_EXTENSION: &str = "bin";
const MAX_EXTENSION_LEN: usize = 10;

/// Generate a fresh key for an uploaded file: `{user_id}/{uuid4}.{ext}`.
///
/// The random component guarantees a locator is unique per upload and never
/// reused; the extension is carried over from the original filename when it
/// is a plain ASCII token, otherwise it falls back to `bin`.
pub fn object_key(user_id: &UserId, filename: &str) -> String {
    format!(
        "{}/{}.{}",
        user_id.as_str(),
        Uuid::new_v4(),
        sanitized_extension(filename)
    )
}

/// Generate a fresh key for a stored text description: `{user_id}/{uuid4}.txt`.
pub fn text_key(user_id: &UserId) -> String {
    format!("{}/{}.txt", user_id.as_str(), Uuid::new_v4())
}

fn sanitized_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
