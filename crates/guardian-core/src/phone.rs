//! Phone-number normalization to E.164.
//!
//! Normalization is strict: input that does not parse, or parses to a number
//! that is not dialable, is rejected with [`Error::InvalidPhoneNumber`]. Raw
//! input is never passed through unchanged.

use phonenumber::{Mode, country};

use crate::{Error, Result};

/// Normalizes raw phone input into canonical E.164 (`+` followed by country
/// code and national significant number, no separators).
///
/// Without a default region only internationally written numbers (`+CC…`)
/// parse. With one, national-format numbers are read as belonging to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneNormalizer {
  default_region: Option<country::Id>,
}

impl PhoneNormalizer {
  /// A normalizer with no default region.
  pub fn new() -> Self { Self::default() }

  /// A normalizer that reads national-format numbers as belonging to
  /// `region` (an ISO 3166-1 alpha-2 code such as `"EG"`).
  pub fn with_default_region(region: &str) -> Result<Self> {
    Ok(Self { default_region: Some(parse_region(region)?) })
  }

  pub fn default_region(&self) -> Option<country::Id> { self.default_region }

  pub fn normalize(&self, raw: &str) -> Result<String> {
    normalize_phone(raw, self.default_region)
  }

  /// Normalize with `region` taking precedence over the configured default.
  pub fn normalize_with(&self, raw: &str, region: Option<&str>) -> Result<String> {
    let region = region.map(parse_region).transpose()?.or(self.default_region);
    normalize_phone(raw, region)
  }
}

/// Parse an ISO 3166-1 alpha-2 region code, case-insensitively.
pub fn parse_region(code: &str) -> Result<country::Id> {
  code
    .trim()
    .to_ascii_uppercase()
    .parse::<country::Id>()
    .map_err(|_| Error::UnknownRegion(code.to_owned()))
}

/// Parse, validate and format `raw` as E.164.
pub fn normalize_phone(raw: &str, default_region: Option<country::Id>) -> Result<String> {
  let parsed = phonenumber::parse(default_region, ascii_digits(raw.trim()))
    .map_err(|_| Error::InvalidPhoneNumber("invalid phone number format".into()))?;

  if !phonenumber::is_valid(&parsed) {
    return Err(Error::InvalidPhoneNumber("invalid phone number".into()));
  }

  Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Rewrite Arabic-Indic (U+0660..) and Extended Arabic-Indic (U+06F0..)
/// digits as ASCII; everything else is kept.
fn ascii_digits(raw: &str) -> String {
  raw
    .chars()
    .map(|c| match c {
      '\u{0660}'..='\u{0669}' => shift_digit(c, 0x0660),
      '\u{06F0}'..='\u{06F9}' => shift_digit(c, 0x06F0),
      _ => c,
    })
    .collect()
}

fn shift_digit(c: char, zero: u32) -> char {
  char::from_digit(c as u32 - zero, 10).unwrap_or(c)
}
