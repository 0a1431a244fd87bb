//! The `ParentStore` trait.
//!
//! Implemented by storage backends (e.g. `guardian-store-sqlite`). The account
//! factory and the admin binary depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::parent::{NewParent, Parent};

/// Abstraction over a persistence backend for parent accounts.
///
/// Backends enforce uniqueness of `phone_primary` and of `email` (when
/// present) and report violations as an error that converts into
/// [`crate::Error::DuplicateKey`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait ParentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Persist a new parent and return it with its assigned `parent_id`.
  /// Exactly one write; never retried.
  fn insert_parent(
    &self,
    input: NewParent,
  ) -> impl Future<Output = Result<Parent, Self::Error>> + Send + '_;

  /// Retrieve a parent by id. Returns `None` if not found.
  fn get_parent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Parent>, Self::Error>> + Send + '_;

  /// Look up a parent by canonical primary phone (the login identifier).
  fn find_by_phone<'a>(
    &'a self,
    phone: &'a str,
  ) -> impl Future<Output = Result<Option<Parent>, Self::Error>> + Send + 'a;

  fn find_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Parent>, Self::Error>> + Send + 'a;

  /// All parents, oldest first.
  fn list_parents(
    &self,
  ) -> impl Future<Output = Result<Vec<Parent>, Self::Error>> + Send + '_;

  /// Delete a parent. Returns `false` if no such parent existed.
  fn delete_parent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
