//! Core types and trait definitions for the Folketing person registry.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the entity schema, the single validation layer, the [`PersonStore`]
//! abstraction and the [`PersonGateway`] that enforces the registry rules on
//! top of any store.
//!
//! [`PersonStore`]: store::PersonStore
//! [`PersonGateway`]: gateway::PersonGateway

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod gateway;
pub mod person;
pub mod store;
pub mod validate;

pub use error::{Error, FieldError, Result};
pub use gateway::PersonGateway;
pub use person::{NewPerson, Person, PersonInput, PersonPatch, Position, RawField};
pub use store::PersonStore;
