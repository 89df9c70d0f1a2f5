//! Test data generation for the blood donation exercise.
//!
//! This crate populates the two database variants of the course schema with
//! synthetic records: accounts, role profiles, donors with valid PESELs,
//! donation visits (donation, examination, lab result, blood bag), hospitals,
//! facilities, transport orders, and merit certificates.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let mut rng = rand::thread_rng();
//! let result = ScenarioBuilder::database_exercise()
//!     .build(&pool, &mut rng)
//!     .await?;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod document;
pub mod generators;

pub use blood_bank::{BloodGroup, BloodType, CertificateLevel, OrderState, Rh, Sex};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{ScenarioBuilder, ScenarioError, ScenarioResult};
    pub use crate::config::{DocumentSeedCounts, SeedConfig, SeedCounts};
    pub use crate::db::{SeedError, Seeder};
    pub use crate::document::{DocumentSeedError, DocumentSeedSummary, DocumentSeeder};
    pub use crate::generators::{
        CertificateGenerator, DonorGenerator, OrderGenerator, UserGenerator, VisitGenerator,
    };
    pub use crate::{BloodGroup, BloodType, CertificateLevel, OrderState, Rh, Sex};
}
