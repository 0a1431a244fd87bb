//! Account-management commands, independent of argument parsing and I/O.

use std::fmt;

use clap::Args;
use guardian_core::{
  Error, Result,
  credential::CredentialHasher,
  factory::ParentAccountFactory,
  parent::{ExtraFields, Parent},
  store::ParentStore,
};

/// Arguments shared by `create-user` and `create-superuser`.
#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
  /// Primary (WhatsApp) phone number; the login identifier.
  #[arg(long)]
  pub phone: String,

  #[arg(long)]
  pub full_name: String,

  #[arg(long)]
  pub email: Option<String>,

  /// Alternate phone number, stored as given.
  #[arg(long)]
  pub phone_alt: Option<String>,

  /// Internal admin notes.
  #[arg(long)]
  pub notes: Option<String>,

  /// Grant a permission (`app_label.codename`); repeatable.
  #[arg(long = "perm", value_name = "PERM")]
  pub permissions: Vec<String>,

  /// Create the account inactive.
  #[arg(long)]
  pub inactive: bool,

  /// Skip the password prompt; the account gets an unusable password.
  #[arg(long)]
  pub no_password: bool,
}

impl CreateArgs {
  pub fn extra_fields(&self) -> ExtraFields {
    ExtraFields {
      full_name: Some(self.full_name.clone()),
      email: self.email.clone(),
      phone_alt: self.phone_alt.clone(),
      is_active: self.inactive.then_some(false),
      notes: self.notes.clone(),
      permissions: self.permissions.iter().cloned().collect(),
      ..Default::default()
    }
  }
}

/// Create a regular or superuser account from command-line arguments.
pub async fn create_account<S, H>(
  factory: &ParentAccountFactory<S, H>,
  args: &CreateArgs,
  password: Option<&str>,
  superuser: bool,
) -> Result<Parent>
where
  S: ParentStore,
  H: CredentialHasher,
{
  let extra = args.extra_fields();
  if let Some(field) = extra.missing_required() {
    return Err(Error::MissingRequiredField(field));
  }

  if superuser {
    factory.create_superuser(&args.phone, password, extra).await
  } else {
    factory.create_user(&args.phone, password, extra).await
  }
}

/// Find an account by primary phone, written in any form the configured
/// normalizer accepts.
pub async fn lookup<S, H>(
  factory: &ParentAccountFactory<S, H>,
  phone: &str,
) -> Result<Option<Parent>>
where
  S: ParentStore,
  H: CredentialHasher,
{
  let canonical = factory.normalizer().normalize(phone)?;
  factory.store().find_by_phone(&canonical).await.map_err(Into::into)
}

/// Delete the account with this primary phone. Returns `false` if there was
/// none.
pub async fn delete_account<S, H>(
  factory: &ParentAccountFactory<S, H>,
  phone: &str,
) -> Result<bool>
where
  S: ParentStore,
  H: CredentialHasher,
{
  let Some(parent) = lookup(factory, phone).await? else {
    return Ok(false);
  };
  factory
    .store()
    .delete_parent(parent.parent_id)
    .await
    .map_err(Into::into)
}

/// Human-readable multi-line summary. Never includes the credential.
pub fn describe(parent: &Parent) -> String {
  let mut out = String::new();
  let mut line = |label: &str, value: &dyn fmt::Display| {
    out.push_str(&format!("{:<14}{value}\n", format!("{label}:")));
  };
  let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());

  line("id", &parent.parent_id);
  line("name", &parent.full_name);
  line("phone", &parent.phone_primary);
  line("alt phone", &or_dash(&parent.phone_alt));
  line("email", &or_dash(&parent.email));
  line("active", &parent.is_active);
  line("staff", &parent.is_staff);
  line("superuser", &parent.is_superuser);
  line(
    "password",
    &if parent.password.is_usable() { "set" } else { "unusable" },
  );
  line("joined", &parent.date_joined.to_rfc3339());
  line(
    "last login",
    &parent.last_login.map_or_else(|| "never".into(), |t| t.to_rfc3339()),
  );
  if !parent.permissions.is_empty() {
    let perms: Vec<&str> = parent.permissions.iter().map(String::as_str).collect();
    line("permissions", &perms.join(", "));
  }
  if let Some(notes) = &parent.notes {
    line("notes", notes);
  }
  out
}
