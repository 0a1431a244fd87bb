//! [`ParentAccountFactory`]: creates parent accounts.
//!
//! The factory owns its collaborators explicitly: a [`ParentStore`] for
//! persistence, a [`CredentialHasher`] for passwords and a [`PhoneNormalizer`]
//! for the login identifier.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  credential::{Argon2Hasher, CredentialHasher},
  parent::{ExtraFields, NewParent, Parent, USERNAME_FIELD},
  phone::PhoneNormalizer,
  store::ParentStore,
};

pub struct ParentAccountFactory<S, H = Argon2Hasher> {
  store:      S,
  hasher:     H,
  normalizer: PhoneNormalizer,
}

impl<S, H> ParentAccountFactory<S, H>
where
  S: ParentStore,
  H: CredentialHasher,
{
  pub fn new(store: S, hasher: H, normalizer: PhoneNormalizer) -> Self {
    Self { store, hasher, normalizer }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn hasher(&self) -> &H { &self.hasher }

  pub fn normalizer(&self) -> &PhoneNormalizer { &self.normalizer }

  /// Create and persist a regular parent account.
  ///
  /// `is_active` defaults to `true`; `is_staff` and `is_superuser` default to
  /// `false`. An absent or empty `password` leaves the account without a
  /// usable password.
  pub async fn create_user(
    &self,
    primary_phone: &str,
    password: Option<&str>,
    extra: ExtraFields,
  ) -> Result<Parent> {
    let raw = primary_phone.trim();
    if raw.is_empty() {
      return Err(Error::MissingRequiredField(USERNAME_FIELD));
    }

    let phone_primary = self.normalizer.normalize(raw)?;
    debug!(raw, canonical = %phone_primary, "normalized primary phone");

    let password = self.hasher.make_credential(password)?;

    let input = NewParent {
      full_name: extra.full_name.map(|n| n.trim().to_owned()).unwrap_or_default(),
      email: extra.email.as_deref().and_then(normalize_email),
      phone_primary,
      phone_alt: extra.phone_alt.as_deref().and_then(non_blank),
      is_active: extra.is_active.unwrap_or(true),
      is_staff: extra.is_staff.unwrap_or(false),
      is_superuser: extra.is_superuser.unwrap_or(false),
      date_joined: extra.date_joined.unwrap_or_else(Utc::now),
      last_login: None,
      notes: extra.notes.as_deref().and_then(non_blank),
      password,
      permissions: extra.permissions,
    };

    let parent = match self.store.insert_parent(input).await {
      Ok(parent) => parent,
      Err(e) => {
        let e: Error = e.into();
        if let Error::DuplicateKey { field } = &e {
          warn!(%field, "parent account already exists");
        }
        return Err(e);
      }
    };

    info!(
      parent_id = %parent.parent_id,
      phone = %parent.phone_primary,
      is_superuser = parent.is_superuser,
      "created parent account"
    );
    Ok(parent)
  }

  /// Create a parent account with staff and superuser status. Caller-supplied
  /// values for those two flags are overridden.
  pub async fn create_superuser(
    &self,
    primary_phone: &str,
    password: Option<&str>,
    mut extra: ExtraFields,
  ) -> Result<Parent> {
    extra.is_staff = Some(true);
    extra.is_superuser = Some(true);
    self.create_user(primary_phone, password, extra).await
  }
}

/// Trim `email` and lower-case its domain part. Blank input yields `None`.
pub fn normalize_email(email: &str) -> Option<String> {
  let email = email.trim();
  if email.is_empty() {
    return None;
  }
  match email.rsplit_once('@') {
    Some((local, domain)) => Some(format!("{local}@{}", domain.to_lowercase())),
    None => Some(email.to_owned()),
  }
}

fn non_blank(s: &str) -> Option<String> {
  let s = s.trim();
  (!s.is_empty()).then(|| s.to_owned())
}
