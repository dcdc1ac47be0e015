//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! and a `Z` suffix, so lexical column order equals chronological order. UUIDs
//! are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use folketing_core::{Person, Position};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Position ────────────────────────────────────────────────────────────────

pub fn decode_position(s: &str) -> Result<Position> {
  s.parse().map_err(|_| Error::UnknownPosition(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str =
  "id, name, party, position, start_date, created_at, updated_at";

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub id:         String,
  pub name:       String,
  pub party:      String,
  pub position:   String,
  pub start_date: String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      party:      row.get(2)?,
      position:   row.get(3)?,
      start_date: row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         decode_uuid(&self.id)?,
      name:       self.name,
      party:      self.party,
      position:   decode_position(&self.position)?,
      start_date: decode_dt(&self.start_date)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sortable() {
    let a = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let b = a + chrono::Duration::microseconds(1);
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea, "2020-01-01T00:00:00.000000Z");
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn unknown_position_is_an_error() {
    assert!(matches!(decode_position("Chancellor"), Err(Error::UnknownPosition(_))));
  }
}
