use anyhow::{Context, Result};
use base64::Engine;
use std::fs;
use std::path::Path;
use tracing::info;

/// Opaque per-installation device token.
///
/// Derived once from platform constants plus a random component, then cached
/// on disk so every submission from this installation carries the same
/// identifier. Removing the cache file regenerates the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let token = fs::read_to_string(path)
                .with_context(|| format!("Failed to read device id cache: {}", path.display()))?;
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Ok(Self(token));
            }
        }

        let fingerprint = format!(
            "{}|{}|{}|{}|{}",
            std::env::consts::OS,
            std::env::consts::ARCH,
            std::env::var("LANG").unwrap_or_default(),
            std::env::var("TZ").unwrap_or_default(),
            uuid::Uuid::new_v4(),
        );

        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(fingerprint);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create device id directory: {}", parent.display()))?;
        }
        fs::write(path, &token)
            .with_context(|| format!("Failed to write device id cache: {}", path.display()))?;

        info!("Generated new device id at {}", path.display());

        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
