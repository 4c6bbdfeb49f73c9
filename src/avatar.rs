// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("{0} is not a supported image (use PNG, JPEG, GIF or WebP)")]
    Unsupported(String),
    #[error("image is {size} bytes, the limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("could not read image: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// Image type from the file's leading bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Turn image bytes into the data URL stored in settings.
pub fn encode_avatar(name: &str, bytes: &[u8]) -> Result<String, AvatarError> {
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(AvatarError::TooLarge {
            size: bytes.len(),
            max: MAX_AVATAR_BYTES,
        });
    }
    let mime = sniff_mime(bytes).ok_or_else(|| AvatarError::Unsupported(name.to_string()))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

pub fn load_avatar(path: &Path) -> Result<String, AvatarError> {
    let bytes = std::fs::read(path)?;
    encode_avatar(&path.display().to_string(), &bytes)
}
