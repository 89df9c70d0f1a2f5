//! Shared domain vocabulary for the blood donation management exercise.
//!
//! This crate holds everything both seeding front ends agree on: the
//! enumerated domain values (blood groups, sexes, order states, certificate
//! levels), PESEL number construction and validation, and the BSON document
//! model used by the MongoDB variant of the schema.

pub mod documents;
pub mod models;
pub mod pesel;

pub use models::{BloodGroup, BloodType, CertificateLevel, OrderState, Rh, Sex};
