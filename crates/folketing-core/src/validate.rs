//! Field rules for create and update payloads.
//!
//! Every rule runs on every request so the caller sees all violated fields at
//! once. `now` is passed in so the future-date rule is deterministic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
  error::{Error, FieldError, Result},
  person::{NewPerson, PersonInput, PersonPatch, Position, RawField},
};

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_NOT_TEXT: &str = "Name must be a string";
pub const PARTY_REQUIRED: &str = "Party is required";
pub const PARTY_NOT_TEXT: &str = "Party must be a string";
pub const POSITION_REQUIRED: &str = "Position is required";
pub const POSITION_INVALID: &str =
  "Position must be either \"Minister\", \"Formand\" or \"Kandidat\"";
pub const START_DATE_REQUIRED: &str = "Start date is required";
pub const START_DATE_INVALID: &str = "Start date must be a valid ISO 8601 date";
pub const START_DATE_FUTURE: &str = "Start date cannot be in the future";

/// Validate a create payload. All four fields are required.
pub fn new_person(input: &PersonInput, now: DateTime<Utc>) -> Result<NewPerson> {
  let mut errors = Vec::new();

  let name =
    required_text(input.name.as_ref(), "name", NAME_REQUIRED, NAME_NOT_TEXT, &mut errors);
  let position = match supplied(input.position.as_ref()) {
    Supplied::Text(raw) => position(raw, &mut errors),
    Supplied::Mistyped => {
      errors.push(FieldError::new("position", POSITION_INVALID));
      None
    }
    Supplied::Absent => {
      errors.push(FieldError::new("position", POSITION_REQUIRED));
      None
    }
  };
  let party =
    required_text(input.party.as_ref(), "party", PARTY_REQUIRED, PARTY_NOT_TEXT, &mut errors);
  let start_date = match supplied(input.start_date.as_ref()) {
    Supplied::Text(raw) => start_date(raw, now, &mut errors),
    Supplied::Mistyped => {
      errors.push(FieldError::new("startDate", START_DATE_INVALID));
      None
    }
    Supplied::Absent => {
      errors.push(FieldError::new("startDate", START_DATE_REQUIRED));
      None
    }
  };

  match (name, party, position, start_date) {
    (Some(name), Some(party), Some(position), Some(start_date)) if errors.is_empty() => {
      Ok(NewPerson { name, party, position, start_date })
    }
    _ => Err(Error::Validation(errors)),
  }
}

/// Validate an update payload.
///
/// Absent and blank fields are skipped and leave the stored value unchanged;
/// every supplied field must satisfy the same rule as on create.
pub fn patch(input: &PersonInput, now: DateTime<Utc>) -> Result<PersonPatch> {
  let mut errors = Vec::new();

  let name = optional_text(input.name.as_ref(), "name", NAME_NOT_TEXT, &mut errors);
  let party = optional_text(input.party.as_ref(), "party", PARTY_NOT_TEXT, &mut errors);
  let position = match supplied(input.position.as_ref()) {
    Supplied::Text(raw) => position(raw, &mut errors),
    Supplied::Mistyped => {
      errors.push(FieldError::new("position", POSITION_INVALID));
      None
    }
    Supplied::Absent => None,
  };
  let start_date = match supplied(input.start_date.as_ref()) {
    Supplied::Text(raw) => start_date(raw, now, &mut errors),
    Supplied::Mistyped => {
      errors.push(FieldError::new("startDate", START_DATE_INVALID));
      None
    }
    Supplied::Absent => None,
  };

  if errors.is_empty() {
    Ok(PersonPatch { name, party, position, start_date })
  } else {
    Err(Error::Validation(errors))
  }
}

/// Parse an ISO 8601 date or date-time into UTC.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339 with any offset, and a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` which is read as UTC.
pub fn parse_start_date(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(naive.and_utc());
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}

// ─── Rules ───────────────────────────────────────────────────────────────────

enum Supplied<'a> {
  Absent,
  Text(&'a str),
  Mistyped,
}

/// Classify a field. Blank text counts as absent.
fn supplied(raw: Option<&RawField>) -> Supplied<'_> {
  match raw {
    None => Supplied::Absent,
    Some(RawField::Mistyped) => Supplied::Mistyped,
    Some(RawField::Text(s)) => match s.trim() {
      "" => Supplied::Absent,
      s => Supplied::Text(s),
    },
  }
}

fn required_text(
  raw: Option<&RawField>,
  field: &'static str,
  missing: &str,
  mistyped: &str,
  errors: &mut Vec<FieldError>,
) -> Option<String> {
  match supplied(raw) {
    Supplied::Text(s) => Some(s.to_owned()),
    Supplied::Mistyped => {
      errors.push(FieldError::new(field, mistyped));
      None
    }
    Supplied::Absent => {
      errors.push(FieldError::new(field, missing));
      None
    }
  }
}

fn optional_text(
  raw: Option<&RawField>,
  field: &'static str,
  mistyped: &str,
  errors: &mut Vec<FieldError>,
) -> Option<String> {
  match supplied(raw) {
    Supplied::Text(s) => Some(s.to_owned()),
    Supplied::Mistyped => {
      errors.push(FieldError::new(field, mistyped));
      None
    }
    Supplied::Absent => None,
  }
}

fn position(raw: &str, errors: &mut Vec<FieldError>) -> Option<Position> {
  match raw.parse() {
    Ok(p) => Some(p),
    Err(_) => {
      errors.push(FieldError::new("position", POSITION_INVALID));
      None
    }
  }
}

fn start_date(
  raw: &str,
  now: DateTime<Utc>,
  errors: &mut Vec<FieldError>,
) -> Option<DateTime<Utc>> {
  match parse_start_date(raw) {
    Some(dt) if dt <= now => Some(dt),
    Some(_) => {
      errors.push(FieldError::new("startDate", START_DATE_FUTURE));
      None
    }
    None => {
      errors.push(FieldError::new("startDate", START_DATE_INVALID));
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() }

  fn input(name: &str, party: &str, position: &str, start: &str) -> PersonInput {
    PersonInput {
      name:       Some(name.into()),
      party:      Some(party.into()),
      position:   Some(position.into()),
      start_date: Some(start.into()),
    }
  }

  fn fields(err: Error) -> Vec<&'static str> {
    match err {
      Error::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn valid_input_is_trimmed() {
    let p = new_person(
      &input("  Mette Frederiksen ", " Socialdemokratiet", "Minister", "2019-06-27"),
      now(),
    )
    .unwrap();
    assert_eq!(p.name, "Mette Frederiksen");
    assert_eq!(p.party, "Socialdemokratiet");
    assert_eq!(p.position, Position::Minister);
    assert_eq!(p.start_date, Utc.with_ymd_and_hms(2019, 6, 27, 0, 0, 0).unwrap());
  }

  #[test]
  fn empty_body_reports_every_field() {
    let err = new_person(&PersonInput::default(), now()).unwrap_err();
    assert_eq!(fields(err), ["name", "position", "party", "startDate"]);
  }

  #[test]
  fn blank_strings_count_as_missing() {
    let err = new_person(&input("   ", "", "Minister", "2020-01-01"), now()).unwrap_err();
    assert_eq!(fields(err), ["name", "party"]);
  }

  #[test]
  fn unknown_position_is_rejected() {
    let err = new_person(&input("A", "B", "Chancellor", "2020-01-01"), now()).unwrap_err();
    let Error::Validation(errors) = err else { panic!("expected validation") };
    assert_eq!(errors, [FieldError::new("position", POSITION_INVALID)]);
  }

  #[test]
  fn future_start_date_is_rejected() {
    let err = new_person(&input("A", "B", "Kandidat", "2024-06-02"), now()).unwrap_err();
    let Error::Validation(errors) = err else { panic!("expected validation") };
    assert_eq!(errors, [FieldError::new("startDate", START_DATE_FUTURE)]);
  }

  #[test]
  fn start_date_equal_to_now_is_accepted() {
    assert!(new_person(&input("A", "B", "Kandidat", "2024-06-01T12:00:00Z"), now()).is_ok());
  }

  #[test]
  fn garbage_start_date_is_rejected() {
    let err = new_person(&input("A", "B", "Formand", "last tuesday"), now()).unwrap_err();
    let Error::Validation(errors) = err else { panic!("expected validation") };
    assert_eq!(errors, [FieldError::new("startDate", START_DATE_INVALID)]);
  }

  #[test]
  fn parses_iso_variants() {
    let expected = Utc.with_ymd_and_hms(2020, 3, 4, 10, 30, 0).unwrap();
    assert_eq!(parse_start_date("2020-03-04T10:30:00Z"), Some(expected));
    assert_eq!(parse_start_date("2020-03-04T12:30:00+02:00"), Some(expected));
    assert_eq!(parse_start_date("2020-03-04T10:30:00.000"), Some(expected));
    assert_eq!(
      parse_start_date("2020-03-04"),
      Some(Utc.with_ymd_and_hms(2020, 3, 4, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_start_date("2020-13-04"), None);
  }

  #[test]
  fn patch_skips_absent_and_blank_fields() {
    let p = patch(
      &PersonInput { name: Some(" ".into()), party: Some("Venstre".into()), ..Default::default() },
      now(),
    )
    .unwrap();
    assert_eq!(p, PersonPatch { party: Some("Venstre".into()), ..Default::default() });
  }

  #[test]
  fn patch_still_checks_supplied_fields() {
    let err = patch(
      &PersonInput {
        position:   Some("President".into()),
        start_date: Some("2999-01-01".into()),
        ..Default::default()
      },
      now(),
    )
    .unwrap_err();
    assert_eq!(fields(err), ["position", "startDate"]);
  }

  #[test]
  fn mistyped_fields_are_reported_with_the_rest() {
    let body = PersonInput {
      name:       Some(RawField::Mistyped),
      party:      Some("".into()),
      position:   Some("King".into()),
      start_date: Some(RawField::Mistyped),
    };
    let Error::Validation(errors) = new_person(&body, now()).unwrap_err() else {
      panic!("expected validation")
    };
    assert_eq!(errors, [
      FieldError::new("name", NAME_NOT_TEXT),
      FieldError::new("position", POSITION_INVALID),
      FieldError::new("party", PARTY_REQUIRED),
      FieldError::new("startDate", START_DATE_INVALID),
    ]);
  }

  #[test]
  fn patch_reports_mistyped_fields() {
    let err = patch(
      &PersonInput {
        party: Some(RawField::Mistyped),
        position: Some(RawField::Mistyped),
        ..Default::default()
      },
      now(),
    )
    .unwrap_err();
    assert_eq!(fields(err), ["party", "position"]);
  }
}
