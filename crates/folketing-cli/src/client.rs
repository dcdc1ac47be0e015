//! Async HTTP client wrapping the folketing JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use folketing_core::{Person, PersonInput};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;

/// `{"success":true,"count":n,"data":[...]}`
#[derive(Debug, Deserialize)]
struct Listing {
  data: Vec<Person>,
}

/// `{"success":true,"data":{...}}`
#[derive(Debug, Deserialize)]
struct Single {
  data: Person,
}

/// Any failure envelope the server produces.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
  #[serde(default)]
  pub error:   Option<String>,
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub errors:  Vec<FieldMessage>,
}

#[derive(Debug, Deserialize)]
pub struct FieldMessage {
  pub field:   String,
  pub message: String,
}

impl ErrorBody {
  /// One human-readable line per problem.
  pub fn lines(&self) -> Vec<String> {
    let mut lines = Vec::new();
    match (&self.error, &self.message) {
      (Some(e), Some(m)) => lines.push(format!("{e}: {m}")),
      (Some(e), None) => lines.push(e.clone()),
      (None, Some(m)) => lines.push(m.clone()),
      (None, None) => {}
    }
    lines.extend(self.errors.iter().map(|f| format!("  {}: {}", f.field, f.message)));
    lines
  }
}

/// Async HTTP client for the folketing JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  base:   Url,
}

impl ApiClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let base = Url::parse(base_url).with_context(|| format!("invalid server URL {base_url:?}"))?;
    if base.cannot_be_a_base() {
      return Err(anyhow!("server URL {base_url:?} cannot carry a path"));
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base })
  }

  /// `<base>/api/persons/<segments...>`, each segment percent-encoded.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(["api", "persons"]).extend(segments);
    }
    url
  }

  /// `GET /api/persons`
  pub async fn list(&self) -> Result<Vec<Person>> {
    let listing: Listing = send(self.client.get(self.url(&[])), "GET /persons").await?;
    Ok(listing.data)
  }

  /// `GET /api/persons/{id}`
  pub async fn get(&self, id: &str) -> Result<Person> {
    let single: Single =
      send(self.client.get(self.url(&[id])), "GET /persons/{id}").await?;
    Ok(single.data)
  }

  /// `POST /api/persons`
  pub async fn create(&self, input: &PersonInput) -> Result<Person> {
    let single: Single =
      send(self.client.post(self.url(&[])).json(input), "POST /persons").await?;
    Ok(single.data)
  }

  /// `PUT /api/persons/{id}`
  pub async fn update(&self, id: &str, input: &PersonInput) -> Result<Person> {
    let single: Single = send(
      self.client.put(self.url(&[id])).json(input),
      "PUT /persons/{id}",
    )
    .await?;
    Ok(single.data)
  }

  /// `DELETE /api/persons/{id}`
  pub async fn delete(&self, id: &str) -> Result<()> {
    let _: serde_json::Value =
      send(self.client.delete(self.url(&[id])), "DELETE /persons/{id}").await?;
    Ok(())
  }

  /// `GET /api/persons/position/{position}`
  pub async fn by_position(&self, position: &str) -> Result<Vec<Person>> {
    let listing: Listing = send(
      self.client.get(self.url(&["position", position])),
      "GET /persons/position",
    )
    .await?;
    Ok(listing.data)
  }

  /// `GET /api/persons/party/{party}`
  pub async fn by_party(&self, party: &str) -> Result<Vec<Person>> {
    let listing: Listing = send(
      self.client.get(self.url(&["party", party])),
      "GET /persons/party",
    )
    .await?;
    Ok(listing.data)
  }
}

async fn send<T: for<'de> Deserialize<'de>>(req: RequestBuilder, what: &str) -> Result<T> {
  let resp = req.send().await.with_context(|| format!("{what} failed"))?;
  if !resp.status().is_success() {
    return Err(api_error(resp, what).await);
  }
  resp.json().await.with_context(|| format!("deserialising {what} response"))
}

async fn api_error(resp: Response, what: &str) -> anyhow::Error {
  let status = resp.status();
  let body: ErrorBody = resp.json().await.unwrap_or_default();
  let lines = body.lines();
  if lines.is_empty() {
    anyhow!("{what} → {status}")
  } else {
    anyhow!("{what} → {status}\n{}", lines.join("\n"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_body_renders_every_field() {
    let body: ErrorBody = serde_json::from_str(
      r#"{"success":false,"error":"Validation failed","errors":[
           {"field":"name","message":"Name is required"},
           {"field":"startDate","message":"Start date is required"}]}"#,
    )
    .unwrap();
    assert_eq!(
      body.lines(),
      [
        "Validation failed",
        "  name: Name is required",
        "  startDate: Start date is required",
      ]
    );
  }

  #[test]
  fn server_error_body_joins_error_and_message() {
    let body: ErrorBody = serde_json::from_str(
      r#"{"success":false,"error":"Internal Server Error","message":"Something went wrong!"}"#,
    )
    .unwrap();
    assert_eq!(body.lines(), ["Internal Server Error: Something went wrong!"]);
  }

  #[test]
  fn url_joins_base_without_double_slash() {
    let client = ApiClient::new("http://localhost:3000/").unwrap();
    assert_eq!(client.url(&["abc"]).as_str(), "http://localhost:3000/api/persons/abc");
    assert_eq!(client.url(&[]).as_str(), "http://localhost:3000/api/persons");
  }

  #[test]
  fn url_segments_are_percent_encoded() {
    let client = ApiClient::new("http://localhost:3000").unwrap();
    assert_eq!(
      client.url(&["party", "Radikale Venstre/x"]).as_str(),
      "http://localhost:3000/api/persons/party/Radikale%20Venstre%2Fx"
    );
  }

  #[test]
  fn rejects_unusable_base_urls() {
    assert!(ApiClient::new("not a url").is_err());
    assert!(ApiClient::new("mailto:someone@example.com").is_err());
  }
}
