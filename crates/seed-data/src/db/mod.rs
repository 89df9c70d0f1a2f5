//! Database integration for the relational seeding variant.
//!
//! The [`Seeder`] inserts generated data into PostgreSQL in dependency
//! order, with support for bulk operations and progress reporting.

mod seeder;

pub use seeder::{SeedError, Seeder};
