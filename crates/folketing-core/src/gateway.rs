//! [`PersonGateway`]: every read and write of person records goes through
//! here.
//!
//! The gateway validates input, enforces name/position uniqueness and turns
//! missing records into [`Error::NotFound`]. The uniqueness check is a read
//! followed by a write with no isolation between them; backends that can
//! enforce the constraint natively (the SQLite store does) close the gap and
//! report the violation as [`Error::Conflict`] through their `From` impl.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  person::{Person, PersonInput, Position},
  store::PersonStore,
  validate,
};

pub struct PersonGateway<S> {
  store: Arc<S>,
}

impl<S> Clone for PersonGateway<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S> PersonGateway<S>
where
  S: PersonStore,
  Error: From<S::Error>,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  #[cfg(test)]
  pub(crate) fn store(&self) -> &S { &self.store }

  /// All records, newest first.
  pub async fn list(&self) -> Result<Vec<Person>> { Ok(self.store.list().await?) }

  pub async fn get(&self, id: &str) -> Result<Person> {
    let id = parse_id(id)?;
    self
      .store
      .get(id)
      .await?
      .ok_or_else(Error::person_not_found)
  }

  pub async fn create(&self, input: &PersonInput) -> Result<Person> {
    let person = validate::new_person(input, Utc::now())?;
    self.ensure_unique(&person.name, person.position, None).await?;

    let created = self.store.insert(person).await?;
    tracing::debug!(id = %created.id, position = %created.position, "person created");
    Ok(created)
  }

  /// Partial update: only supplied fields overwrite the stored record.
  pub async fn update(&self, id: &str, input: &PersonInput) -> Result<Person> {
    let patch = validate::patch(input, Utc::now())?;
    let id = parse_id(id)?;

    let existing = self
      .store
      .get(id)
      .await?
      .ok_or_else(Error::person_not_found)?;

    if let (Some(name), Some(position)) = (&patch.name, patch.position) {
      self.ensure_unique(name, position, Some(id)).await?;
    }

    let merged = patch.apply(existing.fields());
    let updated = self
      .store
      .update(id, merged)
      .await?
      .ok_or_else(Error::person_not_found)?;
    tracing::debug!(%id, "person updated");
    Ok(updated)
  }

  /// Delete a record and return what was removed.
  pub async fn delete(&self, id: &str) -> Result<Person> {
    let id = parse_id(id)?;
    let removed = self
      .store
      .remove(id)
      .await?
      .ok_or_else(Error::person_not_found)?;
    tracing::debug!(%id, "person deleted");
    Ok(removed)
  }

  pub async fn list_by_position(&self, position: &str) -> Result<Vec<Person>> {
    let position: Position = position.parse().map_err(|_| {
      Error::InvalidArgument(format!(
        "Invalid position. Must be one of: {}",
        Position::allowed_list()
      ))
    })?;
    Ok(self.store.find_by_position(position).await?)
  }

  /// Case-insensitive substring match on party. An empty result is an error.
  pub async fn list_by_party(&self, party: &str) -> Result<Vec<Person>> {
    let persons = self.store.find_by_party(party).await?;
    if persons.is_empty() {
      return Err(Error::NotFound(
        "No persons found for the specified party".to_owned(),
      ));
    }
    Ok(persons)
  }

  async fn ensure_unique(
    &self,
    name: &str,
    position: Position,
    exclude: Option<Uuid>,
  ) -> Result<()> {
    match self.store.find_duplicate(name, position, exclude).await? {
      Some(existing) => {
        tracing::debug!(existing = %existing.id, %position, "duplicate name rejected");
        Err(Error::Conflict { position })
      }
      None => Ok(()),
    }
  }
}

fn parse_id(id: &str) -> Result<Uuid> { Uuid::parse_str(id).map_err(|_| Error::invalid_id()) }
