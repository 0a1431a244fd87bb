//! Management commands for guardian accounts.
//!
//! The `guardian` binary is a thin shell over [`commands`]; configuration
//! lives here so it can be shared with tests.

pub mod commands;

use std::path::{Path, PathBuf};

use guardian_core::phone::PhoneNormalizer;
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `guardian.toml` layered with
/// `GUARDIAN_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct AdminConfig {
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// ISO 3166-1 alpha-2 region assumed for numbers written without `+CC`.
  #[serde(default)]
  pub default_region: Option<String>,
}

fn default_store_path() -> PathBuf {
  PathBuf::from("~/.local/share/guardian/guardian.db")
}

impl AdminConfig {
  /// Build the phone normalizer this configuration describes.
  pub fn normalizer(&self) -> guardian_core::Result<PhoneNormalizer> {
    match self.default_region.as_deref().map(str::trim) {
      Some(region) if !region.is_empty() => PhoneNormalizer::with_default_region(region),
      _ => Ok(PhoneNormalizer::new()),
    }
  }

  /// Normalize one number. An explicit `region` replaces the configured one,
  /// which is then not parsed at all.
  pub fn normalize_phone(
    &self,
    phone: &str,
    region: Option<&str>,
  ) -> guardian_core::Result<String> {
    match region {
      Some(region) => PhoneNormalizer::new().normalize_with(phone, Some(region)),
      None => self.normalizer()?.normalize(phone),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
