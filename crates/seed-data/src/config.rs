//! Configuration types for seeding runs.

use serde::{Deserialize, Serialize};

/// Entity counts for a relational seeding run.
///
/// Defaults reproduce the canonical exercise dataset: a large user base, a
/// small medical staff, and one donation visit per donor on average.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCounts {
    /// Number of user accounts.
    pub users: usize,
    /// Number of users promoted to doctors.
    pub doctors: usize,
    /// Number of nurses.
    pub nurses: usize,
    /// Number of users promoted to moderators.
    pub moderators: usize,
    /// Number of hospitals (each owned by a user).
    pub hospitals: usize,
    /// Number of users registered as donors.
    pub donors: usize,
    /// Number of drivers.
    pub drivers: usize,
    /// Number of transports (each operated by a driver).
    pub transports: usize,
    /// Number of blood orders placed by hospitals.
    pub orders: usize,
    /// Number of donation facilities.
    pub facilities: usize,
    /// Number of donation visits (donation + examination + lab result +
    /// blood bag).
    pub donation_visits: usize,
    /// Number of donors considered for merit certificates.
    pub certificates: usize,
}

impl Default for SeedCounts {
    fn default() -> Self {
        Self {
            users: 5000,
            doctors: 20,
            nurses: 30,
            moderators: 10,
            hospitals: 10,
            donors: 2000,
            drivers: 15,
            transports: 15,
            orders: 20,
            facilities: 5,
            donation_visits: 5000,
            certificates: 100,
        }
    }
}

impl SeedCounts {
    /// Small counts for a quick end-to-end run.
    pub fn smoke() -> Self {
        Self {
            users: 25,
            doctors: 3,
            nurses: 3,
            moderators: 2,
            hospitals: 2,
            donors: 10,
            drivers: 2,
            transports: 3,
            orders: 5,
            facilities: 2,
            donation_visits: 15,
            certificates: 5,
        }
    }

    /// Checks that every referenced entity pool is populated.
    ///
    /// A donation visit samples a donor, a nurse, a doctor, and a facility;
    /// an order samples a hospital; a transport samples a driver. Empty
    /// pools would otherwise only surface as a panic mid-generation.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.users == 0 {
            return Err("at least one user is required");
        }
        if self.transports > 0 && self.drivers == 0 {
            return Err("transports require at least one driver");
        }
        if self.orders > 0 && self.hospitals == 0 {
            return Err("orders require at least one hospital");
        }
        if self.donation_visits > 0 {
            if self.donors == 0 {
                return Err("donation visits require at least one donor");
            }
            if self.nurses == 0 {
                return Err("donation visits require at least one nurse");
            }
            if self.doctors == 0 {
                return Err("donation visits require at least one doctor");
            }
            if self.facilities == 0 {
                return Err("donation visits require at least one facility");
            }
        }
        if self.certificates > 0 && self.donors == 0 {
            return Err("certificates require at least one donor");
        }
        Ok(())
    }
}

/// Configuration for relational seeding operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Entity counts.
    pub counts: SeedCounts,
    /// Batch size for database insertions.
    pub batch_size: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            counts: SeedCounts::default(),
            batch_size: 500,
        }
    }
}

/// Entity counts for a document-store seeding run.
///
/// The document variant has no standalone transports, examinations, or
/// certificates; donors embed their examinations and orders embed their
/// delivery runs. Defaults reproduce the exercise dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSeedCounts {
    pub users: usize,
    pub doctors: usize,
    pub donors: usize,
    pub moderators: usize,
    pub hospitals: usize,
    pub drivers: usize,
    pub nurses: usize,
    pub facilities: usize,
    pub orders: usize,
    pub blood_bags: usize,
}

impl Default for DocumentSeedCounts {
    fn default() -> Self {
        Self {
            users: 2000,
            doctors: 300,
            donors: 700,
            moderators: 50,
            hospitals: 50,
            drivers: 200,
            nurses: 200,
            facilities: 100,
            orders: 500,
            blood_bags: 3000,
        }
    }
}

impl DocumentSeedCounts {
    /// Small counts for a quick end-to-end run.
    pub fn smoke() -> Self {
        Self {
            users: 20,
            doctors: 4,
            donors: 8,
            moderators: 2,
            hospitals: 3,
            drivers: 3,
            nurses: 4,
            facilities: 3,
            orders: 6,
            blood_bags: 25,
        }
    }

    /// Checks that every referenced entity pool is populated.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.users == 0 {
            return Err("at least one user is required");
        }
        if self.facilities > 0 && (self.doctors == 0 || self.nurses == 0) {
            return Err("facilities embed doctors and nurses");
        }
        if self.orders > 0 && self.hospitals == 0 {
            return Err("orders require at least one hospital");
        }
        if self.orders > 0 && self.drivers == 0 {
            return Err("order realizations require at least one driver");
        }
        if self.blood_bags > 0 && (self.donors == 0 || self.nurses == 0 || self.facilities == 0) {
            return Err("blood bags reference donors, nurses, and facilities");
        }
        Ok(())
    }
}
