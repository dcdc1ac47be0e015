//! Person, the single entity held by the registry.
//!
//! A person record is a politician with a name, a party, a position and the
//! date they took that position. The store assigns `id`, `created_at` and
//! `updated_at`; everything else comes from a validated request.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{
  Deserialize, Deserializer, Serialize, Serializer,
  de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
};
use uuid::Uuid;

// ─── Position ────────────────────────────────────────────────────────────────

/// The role a person holds. Spelling is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
  Minister,
  /// Chair.
  Formand,
  /// Candidate.
  Kandidat,
}

impl Position {
  pub const ALL: [Position; 3] =
    [Position::Minister, Position::Formand, Position::Kandidat];

  pub fn as_str(self) -> &'static str {
    match self {
      Position::Minister => "Minister",
      Position::Formand => "Formand",
      Position::Kandidat => "Kandidat",
    }
  }

  /// `"Minister, Formand, Kandidat"`.
  pub fn allowed_list() -> String {
    Self::ALL.map(Position::as_str).join(", ")
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when a string is not one of the three position names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPosition(pub String);

impl fmt::Display for UnknownPosition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown position: {:?}", self.0)
  }
}

impl std::error::Error for UnknownPosition {}

impl FromStr for Position {
  type Err = UnknownPosition;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|p| p.as_str() == s)
      .ok_or_else(|| UnknownPosition(s.to_owned()))
  }
}

// ─── Stored record ───────────────────────────────────────────────────────────

/// A persisted person as returned by the store and serialised to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub id:         Uuid,
  pub name:       String,
  pub party:      String,
  pub position:   Position,
  pub start_date: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Person {
  /// The user-supplied content of this record.
  pub fn fields(&self) -> NewPerson {
    NewPerson {
      name:       self.name.clone(),
      party:      self.party.clone(),
      position:   self.position,
      start_date: self.start_date,
    }
  }
}

// ─── Write payloads ──────────────────────────────────────────────────────────

/// Validated content of a person, ready to be inserted or written back.
///
/// Produced by [`validate::new_person`](crate::validate::new_person); strings
/// are already trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
  pub name:       String,
  pub party:      String,
  pub position:   Position,
  pub start_date: DateTime<Utc>,
}

/// Validated partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
  pub name:       Option<String>,
  pub party:      Option<String>,
  pub position:   Option<Position>,
  pub start_date: Option<DateTime<Utc>>,
}

impl PersonPatch {
  /// Shallow merge: every supplied field overwrites the existing one.
  pub fn apply(self, mut base: NewPerson) -> NewPerson {
    if let Some(name) = self.name {
      base.name = name;
    }
    if let Some(party) = self.party {
      base.party = party;
    }
    if let Some(position) = self.position {
      base.position = position;
    }
    if let Some(start_date) = self.start_date {
      base.start_date = start_date;
    }
    base
  }
}

/// Raw request body for create and update, before validation.
///
/// A JSON `null` reads as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:       Option<RawField>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub party:      Option<RawField>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position:   Option<RawField>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date: Option<RawField>,
}

/// One request field as received. Anything other than a string is kept as
/// [`RawField::Mistyped`] so validation can report it with the other fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawField {
  Text(String),
  Mistyped,
}

impl RawField {
  pub fn text(&self) -> Option<&str> {
    match self {
      RawField::Text(s) => Some(s),
      RawField::Mistyped => None,
    }
  }
}

impl From<&str> for RawField {
  fn from(s: &str) -> Self { RawField::Text(s.to_owned()) }
}

impl From<String> for RawField {
  fn from(s: String) -> Self { RawField::Text(s) }
}

impl Serialize for RawField {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      RawField::Text(s) => serializer.serialize_str(s),
      RawField::Mistyped => serializer.serialize_unit(),
    }
  }
}

impl<'de> Deserialize<'de> for RawField {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(RawFieldVisitor)
  }
}

struct RawFieldVisitor;

impl<'de> Visitor<'de> for RawFieldVisitor {
  type Value = RawField;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str("any JSON value") }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<RawField, E> { Ok(v.into()) }

  fn visit_string<E: de::Error>(self, v: String) -> Result<RawField, E> { Ok(v.into()) }

  fn visit_bool<E: de::Error>(self, _: bool) -> Result<RawField, E> { Ok(RawField::Mistyped) }

  fn visit_i64<E: de::Error>(self, _: i64) -> Result<RawField, E> { Ok(RawField::Mistyped) }

  fn visit_u64<E: de::Error>(self, _: u64) -> Result<RawField, E> { Ok(RawField::Mistyped) }

  fn visit_f64<E: de::Error>(self, _: f64) -> Result<RawField, E> { Ok(RawField::Mistyped) }

  fn visit_unit<E: de::Error>(self) -> Result<RawField, E> { Ok(RawField::Mistyped) }

  fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawField, A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(RawField::Mistyped)
  }

  fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawField, A::Error> {
    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(RawField::Mistyped)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn position_parses_exact_names_only() {
    assert_eq!("Minister".parse::<Position>(), Ok(Position::Minister));
    assert_eq!("Formand".parse::<Position>(), Ok(Position::Formand));
    assert_eq!("Kandidat".parse::<Position>(), Ok(Position::Kandidat));
    assert!("minister".parse::<Position>().is_err());
    assert!("Chancellor".parse::<Position>().is_err());
  }

  #[test]
  fn allowed_list_is_comma_separated() {
    assert_eq!(Position::allowed_list(), "Minister, Formand, Kandidat");
  }

  #[test]
  fn person_serialises_camel_case() {
    let now = Utc::now();
    let p = Person {
      id:         Uuid::new_v4(),
      name:       "Mette".into(),
      party:      "Socialdemokratiet".into(),
      position:   Position::Minister,
      start_date: now,
      created_at: now,
      updated_at: now,
    };
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["position"], "Minister");
    assert!(json.get("startDate").is_some());
    assert!(json.get("createdAt").is_some());
    assert!(json.get("updatedAt").is_some());
  }

  #[test]
  fn patch_only_overwrites_supplied_fields() {
    let base = NewPerson {
      name:       "Lars".into(),
      party:      "Venstre".into(),
      position:   Position::Formand,
      start_date: Utc::now(),
    };
    let merged = PersonPatch {
      party: Some("Moderaterne".into()),
      ..PersonPatch::default()
    }
    .apply(base.clone());

    assert_eq!(merged.name, base.name);
    assert_eq!(merged.party, "Moderaterne");
    assert_eq!(merged.position, base.position);
    assert_eq!(merged.start_date, base.start_date);
  }

  #[test]
  fn input_keeps_wrongly_typed_fields() {
    let input: PersonInput = serde_json::from_str(
      r#"{"name":123,"party":["SF"],"position":{"x":1},"startDate":"2019-06-27"}"#,
    )
    .unwrap();
    assert_eq!(input.name, Some(RawField::Mistyped));
    assert_eq!(input.party, Some(RawField::Mistyped));
    assert_eq!(input.position, Some(RawField::Mistyped));
    assert_eq!(input.start_date, Some("2019-06-27".into()));
  }

  #[test]
  fn input_null_reads_as_absent() {
    let input: PersonInput = serde_json::from_str(r#"{"name":null,"party":true}"#).unwrap();
    assert_eq!(input.name, None);
    assert_eq!(input.party, Some(RawField::Mistyped));
    assert_eq!(input.position, None);
  }
}
