//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! the permission set a compact JSON array.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use guardian_core::parent::{Credential, Parent};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Credential ──────────────────────────────────────────────────────────────

pub fn encode_credential(c: &Credential) -> Option<String> {
  c.as_phc().map(str::to_owned)
}

pub fn decode_credential(s: Option<String>) -> Credential {
  s.map_or(Credential::Unusable, Credential::Usable)
}

// ─── Permissions ─────────────────────────────────────────────────────────────

pub fn encode_permissions(perms: &BTreeSet<String>) -> Result<String> {
  Ok(serde_json::to_string(perms)?)
}

pub fn decode_permissions(s: &str) -> Result<BTreeSet<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list matching [`RawParent::from_row`].
pub const PARENT_COLUMNS: &str = "parent_id, full_name, email, phone_primary, phone_alt, \
   is_active, is_staff, is_superuser, date_joined, last_login, notes, password, permissions";

/// Raw values read directly from a `parents` row.
pub struct RawParent {
  pub parent_id:     String,
  pub full_name:     String,
  pub email:         Option<String>,
  pub phone_primary: String,
  pub phone_alt:     Option<String>,
  pub is_active:     bool,
  pub is_staff:      bool,
  pub is_superuser:  bool,
  pub date_joined:   String,
  pub last_login:    Option<String>,
  pub notes:         Option<String>,
  pub password:      Option<String>,
  pub permissions:   String,
}

impl RawParent {
  /// Read a row selected with [`PARENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      parent_id:     row.get(0)?,
      full_name:     row.get(1)?,
      email:         row.get(2)?,
      phone_primary: row.get(3)?,
      phone_alt:     row.get(4)?,
      is_active:     row.get(5)?,
      is_staff:      row.get(6)?,
      is_superuser:  row.get(7)?,
      date_joined:   row.get(8)?,
      last_login:    row.get(9)?,
      notes:         row.get(10)?,
      password:      row.get(11)?,
      permissions:   row.get(12)?,
    })
  }

  pub fn into_parent(self) -> Result<Parent> {
    Ok(Parent {
      parent_id:     decode_uuid(&self.parent_id)?,
      full_name:     self.full_name,
      email:         self.email,
      phone_primary: self.phone_primary,
      phone_alt:     self.phone_alt,
      is_active:     self.is_active,
      is_staff:      self.is_staff,
      is_superuser:  self.is_superuser,
      date_joined:   decode_dt(&self.date_joined)?,
      last_login:    self.last_login.as_deref().map(decode_dt).transpose()?,
      notes:         self.notes,
      password:      decode_credential(self.password),
      permissions:   decode_permissions(&self.permissions)?,
    })
  }
}
