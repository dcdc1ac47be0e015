//! Plain-text rendering of person records.

use folketing_core::Person;

const HEADERS: [&str; 5] = ["ID", "NAME", "PARTY", "POSITION", "START"];

/// An aligned table, one row per person, with a trailing count line.
pub fn table(persons: &[Person]) -> String {
  let rows: Vec<[String; 5]> = persons
    .iter()
    .map(|p| {
      [
        p.id.to_string(),
        p.name.clone(),
        p.party.clone(),
        p.position.to_string(),
        p.start_date.format("%Y-%m-%d").to_string(),
      ]
    })
    .collect();

  let mut widths = HEADERS.map(|h| h.chars().count());
  for row in &rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  push_line(&mut out, &HEADERS.map(str::to_owned), &widths);
  for row in &rows {
    push_line(&mut out, row, &widths);
  }
  out.push_str(&format!("{} person(s)\n", persons.len()));
  out
}

/// A `key: value` block for a single record.
pub fn record(p: &Person) -> String {
  format!(
    "id:         {}\n\
     name:       {}\n\
     party:      {}\n\
     position:   {}\n\
     start date: {}\n\
     created:    {}\n\
     updated:    {}\n",
    p.id,
    p.name,
    p.party,
    p.position,
    p.start_date.format("%Y-%m-%d"),
    p.created_at.to_rfc3339(),
    p.updated_at.to_rfc3339(),
  )
}

fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
  let line = cells
    .iter()
    .zip(widths)
    .map(|(cell, &w)| format!("{cell:<w$}"))
    .collect::<Vec<_>>()
    .join("  ");
  out.push_str(line.trim_end());
  out.push('\n');
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use folketing_core::Position;
  use uuid::Uuid;

  use super::*;

  fn sample(name: &str, party: &str) -> Person {
    let at = Utc.with_ymd_and_hms(2019, 6, 27, 0, 0, 0).unwrap();
    Person {
      id:         Uuid::nil(),
      name:       name.into(),
      party:      party.into(),
      position:   Position::Minister,
      start_date: at,
      created_at: at,
      updated_at: at,
    }
  }

  /// Char column at which `needle` first appears in `line`.
  fn column(line: &str, needle: &str) -> usize {
    line[..line.find(needle).unwrap()].chars().count()
  }

  #[test]
  fn table_aligns_columns_by_chars() {
    let out = table(&[sample("Mette", "S"), sample("Lars Løkke", "Moderaterne")]);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 4);

    let party = column(lines[0], "PARTY");
    assert_eq!(column(lines[1], "S"), party);
    assert_eq!(column(lines[2], "Moderaterne"), party);

    let position = column(lines[0], "POSITION");
    assert_eq!(column(lines[1], "Minister"), position);
    assert_eq!(column(lines[2], "Minister"), position);

    assert_eq!(lines[3], "2 person(s)");
  }

  #[test]
  fn empty_table_still_has_header() {
    assert_eq!(table(&[]), "ID  NAME  PARTY  POSITION  START\n0 person(s)\n");
  }

  #[test]
  fn record_lists_every_field() {
    let out = record(&sample("Mette", "S"));
    assert!(out.contains("name:       Mette"));
    assert!(out.contains("position:   Minister"));
    assert!(out.contains("start date: 2019-06-27"));
  }
}
