//! Document database integration for the MongoDB seeding variant.
//!
//! [`assembly::build_documents`] assembles the full dataset in memory;
//! the [`DocumentSeeder`] purges the collections, inserts everything in
//! dependency order, and applies the denormalized back-references (role
//! profiles on users, available blood bags on facilities).

pub mod assembly;
mod seeder;

pub use assembly::{DocumentData, build_documents};
pub use seeder::{BloodGroupCount, DocumentSeedError, DocumentSeedSummary, DocumentSeeder};
