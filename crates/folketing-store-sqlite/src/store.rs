//! [`SqliteStore`]: the SQLite implementation of [`PersonStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use folketing_core::{
  NewPerson, Person, Position,
  store::{PersonStore, fold_case},
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{PERSON_COLUMNS, RawPerson, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "sqlite store opened");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
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

  /// Run a `SELECT` over [`PERSON_COLUMNS`] with positional text parameters.
  async fn query_persons(&self, sql: String, params: Vec<String>) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }
}

/// Column values for a write, with derived match keys.
struct Columns {
  name:       String,
  name_key:   String,
  party:      String,
  party_key:  String,
  position:   &'static str,
  start_date: String,
}

impl Columns {
  fn new(person: &NewPerson) -> Self {
    Self {
      name:       person.name.clone(),
      name_key:   fold_case(&person.name),
      party:      person.party.clone(),
      party_key:  fold_case(&person.party),
      position:   person.position.as_str(),
      start_date: encode_dt(person.start_date),
    }
  }
}

/// Timestamps are stored at microsecond precision; trim before handing a value
/// back so it compares equal to what a later read returns.
fn stored_precision(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn list(&self) -> Result<Vec<Person>> {
    self
      .query_persons(
        format!("SELECT {PERSON_COLUMNS} FROM persons ORDER BY created_at DESC, rowid DESC"),
        vec![],
      )
      .await
  }

  async fn get(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
            rusqlite::params![id_str],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn insert(&self, input: NewPerson) -> Result<Person> {
    let now = stored_precision(Utc::now());
    let person = Person {
      id:         Uuid::new_v4(),
      name:       input.name,
      party:      input.party,
      position:   input.position,
      start_date: stored_precision(input.start_date),
      created_at: now,
      updated_at: now,
    };

    let row    = Columns::new(&person.fields());
    let id_str = encode_uuid(person.id);
    let at_str = encode_dt(now);

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO persons (
             id, name, name_key, party, party_key,
             position, start_date, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str,
            row.name,
            row.name_key,
            row.party,
            row.party_key,
            row.position,
            row.start_date,
            at_str,
          ],
        );
        match result {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::Duplicate(person.position));
    }
    Ok(person)
  }

  async fn update(&self, id: Uuid, input: NewPerson) -> Result<Option<Person>> {
    let position = input.position;
    let input    = NewPerson { start_date: stored_precision(input.start_date), ..input };
    let row      = Columns::new(&input);
    let id_str   = encode_uuid(id);
    let at_str   = encode_dt(stored_precision(Utc::now()));

    // Outer `None`: unique index violation. Inner `None`: no such row.
    let outcome: Option<Option<RawPerson>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let result = tx.execute(
          "UPDATE persons
             SET name = ?2, name_key = ?3, party = ?4, party_key = ?5,
                 position = ?6, start_date = ?7, updated_at = ?8
           WHERE id = ?1",
          rusqlite::params![
            id_str,
            row.name,
            row.name_key,
            row.party,
            row.party_key,
            row.position,
            row.start_date,
            at_str,
          ],
        );
        let changed = match result {
          Ok(n) => n,
          Err(e) if is_unique_violation(&e) => return Ok(None),
          Err(e) => return Err(e.into()),
        };
        if changed == 0 {
          return Ok(Some(None));
        }

        let raw = tx.query_row(
          &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
          rusqlite::params![id_str],
          RawPerson::from_row,
        )?;
        tx.commit()?;
        Ok(Some(Some(raw)))
      })
      .await?;

    match outcome {
      None => Err(Error::Duplicate(position)),
      Some(raw) => raw.map(RawPerson::into_person).transpose(),
    }
  }

  async fn remove(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
            rusqlite::params![id_str],
            RawPerson::from_row,
          )
          .optional()?;
        if raw.is_some() {
          tx.execute("DELETE FROM persons WHERE id = ?1", rusqlite::params![id_str])?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn find_by_position(&self, position: Position) -> Result<Vec<Person>> {
    self
      .query_persons(
        format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE position = ?1
           ORDER BY start_date DESC"
        ),
        vec![position.as_str().to_owned()],
      )
      .await
  }

  async fn find_by_party(&self, needle: &str) -> Result<Vec<Person>> {
    // instr() instead of LIKE: the needle is plain text, never a pattern.
    self
      .query_persons(
        format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE instr(party_key, ?1) > 0
           ORDER BY position ASC, start_date DESC"
        ),
        vec![fold_case(needle)],
      )
      .await
  }

  async fn find_duplicate(
    &self,
    name: &str,
    position: Position,
    exclude: Option<Uuid>,
  ) -> Result<Option<Person>> {
    let name_key    = fold_case(name);
    let position    = position.as_str();
    let exclude_str = exclude.map(encode_uuid);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {PERSON_COLUMNS} FROM persons
               WHERE name_key = ?1 AND position = ?2
                 AND (?3 IS NULL OR id != ?3)
               LIMIT 1"
            ),
            rusqlite::params![name_key, position, exclude_str],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }
}
