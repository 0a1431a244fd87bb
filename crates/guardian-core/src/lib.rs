//! Core types and trait definitions for guardian (parent) accounts.
//!
//! This crate knows nothing about any concrete database. Persistence and
//! credential hashing are reached through the [`store::ParentStore`] and
//! [`credential::CredentialHasher`] seams, which the account factory receives
//! explicitly.

// Native `async fn` in traits; the store trait spells out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod capability;
pub mod credential;
pub mod error;
pub mod factory;
pub mod parent;
pub mod phone;
pub mod store;

pub use error::{Error, Result};
