//! [`SqliteStore`] — the SQLite implementation of [`ParentStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use guardian_core::{
  parent::{NewParent, Parent},
  store::ParentStore,
};

use crate::{
  Error, Result,
  encode::{
    PARENT_COLUMNS, RawParent, encode_credential, encode_dt,
    encode_permissions, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A guardian account store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch at most one parent where `column = value`.
  async fn find_one(&self, column: &'static str, value: String) -> Result<Option<Parent>> {
    let raw: Option<RawParent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PARENT_COLUMNS} FROM parents WHERE {column} = ?1"),
            rusqlite::params![value],
            RawParent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawParent::into_parent).transpose()
  }
}

/// Name the column behind a `UNIQUE` violation, if `err` is one.
///
/// SQLite reports these as `UNIQUE constraint failed: parents.<column>`.
fn unique_violation(err: &tokio_rusqlite::Error) -> Option<String> {
  let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, Some(msg))) = err
  else {
    return None;
  };
  if code.extended_code != rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
    return None;
  }
  let column = msg.rsplit_once('.').map_or(msg.as_str(), |(_, c)| c);
  Some(column.trim().to_owned())
}

// ─── ParentStore impl ────────────────────────────────────────────────────────

impl ParentStore for SqliteStore {
  type Error = Error;

  async fn insert_parent(&self, input: NewParent) -> Result<Parent> {
    let parent = input.into_parent(Uuid::new_v4());

    let id_str          = encode_uuid(parent.parent_id);
    let full_name       = parent.full_name.clone();
    let email           = parent.email.clone();
    let phone_primary   = parent.phone_primary.clone();
    let phone_alt       = parent.phone_alt.clone();
    let is_active       = parent.is_active;
    let is_staff        = parent.is_staff;
    let is_superuser    = parent.is_superuser;
    let joined_str      = encode_dt(parent.date_joined);
    let last_login_str  = parent.last_login.map(encode_dt);
    let notes           = parent.notes.clone();
    let password_str    = encode_credential(&parent.password);
    let permissions_str = encode_permissions(&parent.permissions)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO parents (
             parent_id, full_name, email, phone_primary, phone_alt,
             is_active, is_staff, is_superuser,
             date_joined, last_login, notes, password, permissions
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            id_str,
            full_name,
            email,
            phone_primary,
            phone_alt,
            is_active,
            is_staff,
            is_superuser,
            joined_str,
            last_login_str,
            notes,
            password_str,
            permissions_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| match unique_violation(&e) {
        Some(column) => Error::DuplicateKey(column),
        None => Error::Database(e),
      })?;

    Ok(parent)
  }

  async fn get_parent(&self, id: Uuid) -> Result<Option<Parent>> {
    self.find_one("parent_id", encode_uuid(id)).await
  }

  async fn find_by_phone(&self, phone: &str) -> Result<Option<Parent>> {
    self.find_one("phone_primary", phone.to_owned()).await
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<Parent>> {
    self.find_one("email", email.to_owned()).await
  }

  async fn list_parents(&self) -> Result<Vec<Parent>> {
    let raws: Vec<RawParent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PARENT_COLUMNS} FROM parents ORDER BY date_joined, rowid"
        ))?;
        let rows = stmt
          .query_map([], RawParent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawParent::into_parent).collect()
  }

  async fn delete_parent(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM parents WHERE parent_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }
}
