//! Avatar selection for user profiles.

use std::path::Path;

use rand_core::{OsRng, RngCore};

/// Largest accepted avatar upload.
pub const MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

/// Number of default avatars a username can hash to.
const DEFAULT_AVATAR_COUNT: u32 = 5;

const AVATAR_SERVICE: &str = "https://i.pravatar.cc/150";

/// Avatars offered by "pick one for me".
pub const PRESET_AVATARS: &[&str] = &[
    "https://i.pravatar.cc/150?img=1",
    "https://i.pravatar.cc/150?img=3",
    "https://i.pravatar.cc/150?img=5",
    "https://i.pravatar.cc/150?img=7",
    "https://i.pravatar.cc/150?img=9",
];

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Stable 32-bit string hash (`h * 31 + c` over UTF-16 units, wrapping).
///
/// Not cryptographic; only used to map a username onto a default avatar.
pub fn hash_string(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

/// The avatar shown for a user who never picked one.
pub fn default_avatar_url(username: &str) -> String {
    let index = hash_string(username) % DEFAULT_AVATAR_COUNT + 1;
    format!("{AVATAR_SERVICE}?img={index}")
}

/// A random entry from [`PRESET_AVATARS`].
pub fn random_preset() -> &'static str {
    let idx = OsRng.next_u32() as usize % PRESET_AVATARS.len();
    PRESET_AVATARS[idx]
}

/// Check that a file looks like an image and is small enough to use.
///
/// The error string is meant for the user.
pub fn validate_upload(path: &Path, size: u64) -> Result<(), String> {
    let is_image = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !is_image {
        return Err("Please select an image file (JPEG, PNG, etc.)".into());
    }
    if size > MAX_UPLOAD_BYTES {
        return Err("Image size should be less than 2MB".into());
    }
    Ok(())
}
