//! The `Parent` record: a guardian account.
//!
//! `Parent` is plain data. Authentication and permission behaviour are layered
//! on through the traits in [`crate::capability`] rather than inherited.

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The field used as the login identifier.
pub const USERNAME_FIELD: &str = "phone_primary";

/// Fields an interactive account-creation command must prompt for, in
/// addition to the username field and password.
pub const REQUIRED_FIELDS: &[&str] = &["full_name"];

// ─── Credential ──────────────────────────────────────────────────────────────

/// A stored password.
///
/// `Usable` holds a PHC string (e.g. `$argon2id$v=19$…`). `Unusable` marks an
/// account that cannot log in with a password at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Credential {
  Usable(String),
  #[default]
  Unusable,
}

impl Credential {
  pub fn is_usable(&self) -> bool { matches!(self, Self::Usable(_)) }

  /// The PHC string, if any.
  pub fn as_phc(&self) -> Option<&str> {
    match self {
      Self::Usable(phc) => Some(phc),
      Self::Unusable => None,
    }
  }
}

// ─── Parent ──────────────────────────────────────────────────────────────────

/// A guardian account as persisted by a [`crate::store::ParentStore`].
/// Serializes without its credential.
#[derive(Debug, Clone, Serialize)]
pub struct Parent {
  pub parent_id:     Uuid,
  pub full_name:     String,
  /// Unique across all parents when present.
  pub email:         Option<String>,
  /// Canonical E.164 form; unique across all parents.
  pub phone_primary: String,
  pub phone_alt:     Option<String>,
  pub is_active:     bool,
  pub is_staff:      bool,
  pub is_superuser:  bool,
  pub date_joined:   DateTime<Utc>,
  pub last_login:    Option<DateTime<Utc>>,
  /// Internal admin notes.
  pub notes:         Option<String>,
  #[serde(skip)]
  pub password:      Credential,
  /// Directly granted permissions, as `"<app_label>.<codename>"`.
  pub permissions:   BTreeSet<String>,
}

impl fmt::Display for Parent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.full_name, self.phone_primary)
  }
}

// ─── NewParent ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::ParentStore::insert_parent`].
/// `parent_id` is always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewParent {
  pub full_name:     String,
  pub email:         Option<String>,
  pub phone_primary: String,
  pub phone_alt:     Option<String>,
  pub is_active:     bool,
  pub is_staff:      bool,
  pub is_superuser:  bool,
  pub date_joined:   DateTime<Utc>,
  pub last_login:    Option<DateTime<Utc>>,
  pub notes:         Option<String>,
  pub password:      Credential,
  pub permissions:   BTreeSet<String>,
}

impl NewParent {
  /// Attach a store-assigned identifier.
  pub fn into_parent(self, parent_id: Uuid) -> Parent {
    Parent {
      parent_id,
      full_name: self.full_name,
      email: self.email,
      phone_primary: self.phone_primary,
      phone_alt: self.phone_alt,
      is_active: self.is_active,
      is_staff: self.is_staff,
      is_superuser: self.is_superuser,
      date_joined: self.date_joined,
      last_login: self.last_login,
      notes: self.notes,
      password: self.password,
      permissions: self.permissions,
    }
  }
}

// ─── ExtraFields ─────────────────────────────────────────────────────────────

/// Optional overrides accepted by the account factory. `None` means "use the
/// default".
#[derive(Debug, Clone, Default)]
pub struct ExtraFields {
  pub full_name:    Option<String>,
  pub email:        Option<String>,
  pub phone_alt:    Option<String>,
  pub is_active:    Option<bool>,
  pub is_staff:     Option<bool>,
  pub is_superuser: Option<bool>,
  pub date_joined:  Option<DateTime<Utc>>,
  pub notes:        Option<String>,
  pub permissions:  BTreeSet<String>,
}

impl ExtraFields {
  /// The first of [`REQUIRED_FIELDS`] left absent or blank, if any.
  pub fn missing_required(&self) -> Option<&'static str> {
    REQUIRED_FIELDS.iter().copied().find(|field| {
      let value = match *field {
        "full_name" => self.full_name.as_deref(),
        _ => None,
      };
      value.is_none_or(|v| v.trim().is_empty())
    })
  }
}
