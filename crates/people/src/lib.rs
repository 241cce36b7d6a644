//! People directory domain module (the firm's leadership and associates).
//!
//! This crate contains the person record model, the fixed seed set and the
//! directory ordering, implemented purely as deterministic domain logic (no IO,
//! no HTTP, no storage).

pub mod person;
pub mod seed;

pub use person::{directory_order, sort_directory, NewPerson, Person, PersonId, PersonPatch, PersonType};
pub use seed::initial_people;
