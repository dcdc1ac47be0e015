//! The `PersonStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `folketing-store-sqlite`). It covers raw persistence only: identifier and
//! timestamp assignment, ordering and matching. Validation and the registry
//! rules live in [`PersonGateway`](crate::gateway::PersonGateway).

use std::future::Future;

use uuid::Uuid;

use crate::person::{NewPerson, Person, Position};

/// Abstraction over a person store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every record, newest `created_at` first.
  fn list(&self) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Persist a new record. The store assigns `id`, `created_at` and
  /// `updated_at`.
  ///
  /// A store that enforces name/position uniqueness itself reports a
  /// violation through its error type.
  fn insert(
    &self,
    person: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Overwrite the content of an existing record and bump `updated_at`.
  /// Returns `None` if the record no longer exists.
  fn update(
    &self,
    id: Uuid,
    person: NewPerson,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a record, returning it. Returns `None` if not found.
  fn remove(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Records holding `position`, latest `start_date` first.
  fn find_by_position(
    &self,
    position: Position,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Records whose party contains `needle`, compared case-insensitively as
  /// plain text. Ordered by position name ascending, then latest `start_date`
  /// first.
  fn find_by_party<'a>(
    &'a self,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Any record other than `exclude` whose name equals `name` ignoring case
  /// and whose position is `position`.
  fn find_duplicate<'a>(
    &'a self,
    name: &'a str,
    position: Position,
    exclude: Option<Uuid>,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;
}

/// Case folding shared by every backend for name and party matching.
pub fn fold_case(s: &str) -> String { s.to_lowercase() }
