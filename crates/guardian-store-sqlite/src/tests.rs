//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use guardian_core::{
  capability::{Authenticatable, PermissionCheck},
  credential::Argon2Hasher,
  factory::ParentAccountFactory,
  parent::{Credential, ExtraFields, NewParent},
  phone::PhoneNormalizer,
  store::ParentStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_parent(phone: &str, email: Option<&str>) -> NewParent {
  NewParent {
    full_name:     "Layla Hassan".into(),
    email:         email.map(str::to_owned),
    phone_primary: phone.into(),
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

// ─── Inserts and reads ───────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get() {
  let s = store().await;

  let mut input = new_parent("+201234567890", Some("layla@example.com"));
  input.phone_alt = Some("+201098765432".into());
  input.notes = Some("two children enrolled".into());
  input.password = Credential::Usable("$argon2id$v=19$fake".into());
  input.permissions = ["students.view_student".to_owned()].into();
  input.last_login = Some(Utc::now() - Duration::days(1));

  let inserted = s.insert_parent(input).await.unwrap();
  let fetched = s.get_parent(inserted.parent_id).await.unwrap().unwrap();

  assert_eq!(fetched.parent_id, inserted.parent_id);
  assert_eq!(fetched.full_name, "Layla Hassan");
  assert_eq!(fetched.email.as_deref(), Some("layla@example.com"));
  assert_eq!(fetched.phone_primary, "+201234567890");
  assert_eq!(fetched.phone_alt.as_deref(), Some("+201098765432"));
  assert_eq!(fetched.notes.as_deref(), Some("two children enrolled"));
  assert_eq!(fetched.password, inserted.password);
  assert_eq!(fetched.permissions, inserted.permissions);
  assert_eq!(fetched.date_joined, inserted.date_joined);
  assert_eq!(fetched.last_login, inserted.last_login);
  assert!(fetched.is_active);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get_parent(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn unusable_password_roundtrips_as_null() {
  let s = store().await;
  let p = s
    .insert_parent(new_parent("+201234567890", None))
    .await
    .unwrap();
  let fetched = s.get_parent(p.parent_id).await.unwrap().unwrap();
  assert_eq!(fetched.password, Credential::Unusable);
}

#[tokio::test]
async fn find_by_phone_and_email() {
  let s = store().await;
  let p = s
    .insert_parent(new_parent("+201234567890", Some("layla@example.com")))
    .await
    .unwrap();

  let by_phone = s.find_by_phone("+201234567890").await.unwrap().unwrap();
  assert_eq!(by_phone.parent_id, p.parent_id);

  let by_email = s.find_by_email("layla@example.com").await.unwrap().unwrap();
  assert_eq!(by_email.parent_id, p.parent_id);

  assert!(s.find_by_phone("+16502530000").await.unwrap().is_none());
  assert!(s.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_oldest_first() {
  let s = store().await;
  let now = Utc::now();

  let mut later = new_parent("+16502530000", None);
  later.date_joined = now;
  let mut earlier = new_parent("+201234567890", None);
  earlier.date_joined = now - Duration::hours(1);

  s.insert_parent(later).await.unwrap();
  s.insert_parent(earlier).await.unwrap();

  let all = s.list_parents().await.unwrap();
  let phones: Vec<_> = all.iter().map(|p| p.phone_primary.as_str()).collect();
  assert_eq!(phones, ["+201234567890", "+16502530000"]);
}

#[tokio::test]
async fn delete() {
  let s = store().await;
  let p = s
    .insert_parent(new_parent("+201234567890", None))
    .await
    .unwrap();

  assert!(s.delete_parent(p.parent_id).await.unwrap());
  assert!(!s.delete_parent(p.parent_id).await.unwrap());
  assert!(s.get_parent(p.parent_id).await.unwrap().is_none());
}

// ─── Uniqueness ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_phone_is_rejected() {
  let s = store().await;
  s.insert_parent(new_parent("+201234567890", None)).await.unwrap();

  let err = s
    .insert_parent(new_parent("+201234567890", None))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateKey(ref c) if c == "phone_primary"));
  assert_eq!(s.list_parents().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.insert_parent(new_parent("+201234567890", Some("a@example.com")))
    .await
    .unwrap();

  let err = s
    .insert_parent(new_parent("+16502530000", Some("a@example.com")))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateKey(ref c) if c == "email"));
}

#[tokio::test]
async fn missing_emails_do_not_collide() {
  let s = store().await;
  s.insert_parent(new_parent("+201234567890", None)).await.unwrap();
  s.insert_parent(new_parent("+16502530000", None)).await.unwrap();
  assert_eq!(s.list_parents().await.unwrap().len(), 2);
}

#[tokio::test]
async fn empty_phone_violates_check() {
  let s = store().await;
  let err = s.insert_parent(new_parent("", None)).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[test]
fn duplicate_key_converts_to_core_error() {
  let core: guardian_core::Error = Error::DuplicateKey("email".into()).into();
  assert!(matches!(core, guardian_core::Error::DuplicateKey { ref field } if field == "email"));

  let core: guardian_core::Error = Error::DateParse("bad".into()).into();
  assert!(matches!(core, guardian_core::Error::Store(_)));
}

// ─── Through the factory ─────────────────────────────────────────────────────

#[tokio::test]
async fn factory_over_sqlite() {
  let factory = ParentAccountFactory::new(
    store().await,
    Argon2Hasher,
    PhoneNormalizer::with_default_region("EG").unwrap(),
  );

  let admin = factory
    .create_superuser(
      "0123 456 7890",
      Some("s3cret"),
      ExtraFields { full_name: Some("Head Teacher".into()), ..Default::default() },
    )
    .await
    .unwrap();

  let stored = factory
    .store()
    .find_by_phone("+201234567890")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(stored.parent_id, admin.parent_id);
  assert!(stored.is_staff && stored.is_superuser);
  assert!(stored.check_password("s3cret", factory.hasher()));
  assert!(stored.has_perm("students.delete_student"));

  let err = factory
    .create_user("+20 123 456 7890", None, ExtraFields::default())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    guardian_core::Error::DuplicateKey { ref field } if field == "phone_primary"
  ));
}
