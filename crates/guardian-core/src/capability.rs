//! Capabilities a [`Parent`] satisfies: password authentication and
//! permission checks.

use std::collections::BTreeSet;

use crate::{
  Result,
  credential::CredentialHasher,
  parent::{Credential, Parent},
};

// ─── Authenticatable ─────────────────────────────────────────────────────────

/// A record that can log in with a username and password.
pub trait Authenticatable {
  /// The login identifier.
  fn username(&self) -> &str;

  fn is_active(&self) -> bool;

  fn credential(&self) -> &Credential;

  fn credential_mut(&mut self) -> &mut Credential;

  fn has_usable_password(&self) -> bool { self.credential().is_usable() }

  fn set_unusable_password(&mut self) {
    *self.credential_mut() = Credential::Unusable;
  }

  /// Replace the stored credential. `None` or an empty string makes the
  /// password unusable.
  fn set_password<H>(&mut self, plaintext: Option<&str>, hasher: &H) -> Result<()>
  where
    H: CredentialHasher + ?Sized,
  {
    *self.credential_mut() = hasher.make_credential(plaintext)?;
    Ok(())
  }

  fn check_password<H>(&self, plaintext: &str, hasher: &H) -> bool
  where
    H: CredentialHasher + ?Sized,
  {
    match self.credential() {
      Credential::Usable(phc) => hasher.verify(plaintext, phc),
      Credential::Unusable => false,
    }
  }
}

// ─── PermissionCheck ─────────────────────────────────────────────────────────

/// Permission checks over directly granted permission strings of the form
/// `"<app_label>.<codename>"`.
///
/// Inactive accounts hold nothing. Active superusers hold everything.
pub trait PermissionCheck: Authenticatable {
  fn is_superuser(&self) -> bool;

  fn permissions(&self) -> &BTreeSet<String>;

  fn has_perm(&self, perm: &str) -> bool {
    if !self.is_active() {
      return false;
    }
    self.is_superuser() || self.permissions().contains(perm)
  }

  fn has_perms<'a, I>(&self, perms: I) -> bool
  where
    I: IntoIterator<Item = &'a str>,
  {
    perms.into_iter().all(|p| self.has_perm(p))
  }

  /// Whether any permission is held within `app_label`.
  fn has_module_perms(&self, app_label: &str) -> bool {
    if !self.is_active() {
      return false;
    }
    self.is_superuser()
      || self
        .permissions()
        .iter()
        .filter_map(|p| p.split_once('.'))
        .any(|(app, _)| app == app_label)
  }
}

// ─── Parent impls ────────────────────────────────────────────────────────────

impl Authenticatable for Parent {
  fn username(&self) -> &str { &self.phone_primary }

  fn is_active(&self) -> bool { self.is_active }

  fn credential(&self) -> &Credential { &self.password }

  fn credential_mut(&mut self) -> &mut Credential { &mut self.password }
}

impl PermissionCheck for Parent {
  fn is_superuser(&self) -> bool { self.is_superuser }

  fn permissions(&self) -> &BTreeSet<String> { &self.permissions }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::credential::Argon2Hasher;

  fn parent() -> Parent {
    Parent {
      parent_id:     Uuid::new_v4(),
      full_name:     "Omar Said".into(),
      email:         None,
      phone_primary: "+201234567890".into(),
      phone_alt:     None,
      is_active:     true,
      is_staff:      false,
      is_superuser:  false,
      date_joined:   Utc::now(),
      last_login:    None,
      notes:         None,
      password:      Credential::Unusable,
      permissions:   BTreeSet::new(),
    }
  }

  #[test]
  fn username_is_primary_phone() {
    assert_eq!(parent().username(), "+201234567890");
  }

  #[test]
  fn set_and_check_password() {
    let mut p = parent();
    p.set_password(Some("hunter2"), &Argon2Hasher).unwrap();
    assert!(p.has_usable_password());
    assert!(p.check_password("hunter2", &Argon2Hasher));
    assert!(!p.check_password("hunter3", &Argon2Hasher));

    p.set_unusable_password();
    assert!(!p.has_usable_password());
    assert!(!p.check_password("hunter2", &Argon2Hasher));
  }

  #[test]
  fn empty_password_is_unusable() {
    let mut p = parent();
    p.set_password(Some(""), &Argon2Hasher).unwrap();
    assert!(!p.has_usable_password());
    assert!(!p.check_password("", &Argon2Hasher));
  }

  #[test]
  fn direct_grants() {
    let mut p = parent();
    p.permissions.insert("students.view_student".into());

    assert!(p.has_perm("students.view_student"));
    assert!(!p.has_perm("students.change_student"));
    assert!(p.has_module_perms("students"));
    assert!(!p.has_module_perms("billing"));
    assert!(!p.has_perms(["students.view_student", "students.change_student"]));
  }

  #[test]
  fn active_superuser_holds_everything() {
    let mut p = parent();
    p.is_superuser = true;
    assert!(p.has_perm("anything.at_all"));
    assert!(p.has_module_perms("billing"));
    assert!(p.has_perms(["a.b", "c.d"]));
  }

  #[test]
  fn inactive_accounts_hold_nothing() {
    let mut p = parent();
    p.is_superuser = true;
    p.permissions.insert("students.view_student".into());
    p.is_active = false;

    assert!(!p.has_perm("students.view_student"));
    assert!(!p.has_module_perms("students"));
  }
}
