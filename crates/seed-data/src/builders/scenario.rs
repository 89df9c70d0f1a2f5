//! Fluent builder for constructing complete seed scenarios.

use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::SeedCounts;
use crate::db::{SeedError, Seeder};
use crate::generators::{
    CertificateGenerator, DonationVisit, DonorGenConfig, DonorGenerator, GeneratedBloodBagOrder,
    GeneratedCertificate, GeneratedDoctor, GeneratedDoctorFacility, GeneratedDonor,
    GeneratedDriver, GeneratedFacility, GeneratedHospital, GeneratedModerator, GeneratedNurse,
    GeneratedNurseFacility, GeneratedOrder, GeneratedTransport, GeneratedUser, OrderGenConfig,
    OrderGenerator, UniquenessExhausted, UserGenerator, VisitGenConfig, VisitGenerator,
    assign_doctors, assign_moderators, deal_bags_to_orders, generate_drivers, generate_facilities,
    generate_hospitals, generate_nurses, generate_transports, staff_assignments,
};

/// Error raised while generating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid seed counts: {0}")]
    InvalidCounts(&'static str),
    #[error(transparent)]
    Uniqueness(#[from] UniquenessExhausted),
}

/// Result of building and seeding a scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    pub users: Vec<GeneratedUser>,
    pub doctors: Vec<GeneratedDoctor>,
    pub moderators: Vec<GeneratedModerator>,
    pub nurses: Vec<GeneratedNurse>,
    pub drivers: Vec<GeneratedDriver>,
    pub hospitals: Vec<GeneratedHospital>,
    pub donors: Vec<GeneratedDonor>,
    pub transports: Vec<GeneratedTransport>,
    pub orders: Vec<GeneratedOrder>,
    pub facilities: Vec<GeneratedFacility>,
    pub visits: Vec<DonationVisit>,
    pub certificates: Vec<GeneratedCertificate>,
    pub nurse_facilities: Vec<GeneratedNurseFacility>,
    pub doctor_facilities: Vec<GeneratedDoctorFacility>,
    pub blood_bag_orders: Vec<GeneratedBloodBagOrder>,
}

/// Builder for creating complete seed scenarios.
///
/// # Example
///
/// ```rust,ignore
/// let result = ScenarioBuilder::database_exercise()
///     .build(&pool, &mut rng)
///     .await?;
/// ```
pub struct ScenarioBuilder {
    counts: SeedCounts,
    donor_config: DonorGenConfig,
    visit_config: VisitGenConfig,
    order_config: OrderGenConfig,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    /// Creates a new scenario builder with default settings.
    pub fn new() -> Self {
        Self {
            counts: SeedCounts::default(),
            donor_config: DonorGenConfig::default(),
            visit_config: VisitGenConfig::default(),
            order_config: OrderGenConfig::default(),
        }
    }

    /// Sets all entity counts at once.
    pub fn with_counts(mut self, counts: SeedCounts) -> Self {
        self.counts = counts;
        self
    }

    /// Sets the number of users to generate.
    pub fn with_users(mut self, count: usize) -> Self {
        self.counts.users = count;
        self
    }

    /// Sets the number of donors to generate.
    pub fn with_donors(mut self, count: usize) -> Self {
        self.counts.donors = count;
        self
    }

    /// Sets the number of donation visits to generate.
    pub fn with_donation_visits(mut self, count: usize) -> Self {
        self.counts.donation_visits = count;
        self
    }

    /// Sets the donor generation configuration.
    pub fn with_donor_config(mut self, config: DonorGenConfig) -> Self {
        self.donor_config = config;
        self
    }

    /// Sets the visit generation configuration.
    pub fn with_visit_config(mut self, config: VisitGenConfig) -> Self {
        self.visit_config = config;
        self
    }

    /// Sets the order generation configuration.
    pub fn with_order_config(mut self, config: OrderGenConfig) -> Self {
        self.order_config = config;
        self
    }

    /// Builds the scenario (generates data but doesn't seed the database).
    ///
    /// Entities are generated in dependency order, so every foreign key
    /// points at an entity created earlier in this function.
    pub fn build_data(&self, rng: &mut impl Rng) -> Result<ScenarioResult, ScenarioError> {
        self.counts.validate().map_err(ScenarioError::InvalidCounts)?;

        // Accounts first; almost everything hangs off a user
        let mut user_gen = UserGenerator::new();
        let users = user_gen.generate_batch(self.counts.users, rng)?;
        let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

        let doctors = assign_doctors(&user_ids, self.counts.doctors, rng);
        let moderators = assign_moderators(&user_ids, self.counts.moderators, rng);
        let nurses = generate_nurses(self.counts.nurses, rng);
        let drivers = generate_drivers(self.counts.drivers, rng);
        let hospitals = generate_hospitals(&user_ids, self.counts.hospitals, rng);

        let mut donor_gen = DonorGenerator::with_config(self.donor_config.clone());
        let donor_user_ids: Vec<Uuid> = user_ids
            .choose_multiple(rng, self.counts.donors)
            .copied()
            .collect();
        let donors = donor_gen.generate_batch(&donor_user_ids, rng)?;

        let driver_ids: Vec<Uuid> = drivers.iter().map(|d| d.id).collect();
        let transports = generate_transports(&driver_ids, self.counts.transports, rng);

        let hospital_ids: Vec<Uuid> = hospitals.iter().map(|h| h.id).collect();
        let transport_ids: Vec<Uuid> = transports.iter().map(|t| t.id).collect();
        let order_gen = OrderGenerator::with_config(self.order_config.clone());
        let orders =
            order_gen.generate_batch(&hospital_ids, &transport_ids, self.counts.orders, rng);

        let facilities = generate_facilities(self.counts.facilities, rng);

        // Donation visits sample the pools built above
        let doctor_ids: Vec<Uuid> = doctors.iter().map(|d| d.id).collect();
        let nurse_ids: Vec<Uuid> = nurses.iter().map(|n| n.id).collect();
        let facility_ids: Vec<Uuid> = facilities.iter().map(|f| f.id).collect();
        let donor_ids: Vec<Uuid> = donors.iter().map(|d| d.id).collect();

        let mut visit_gen = VisitGenerator::with_config(self.visit_config.clone());
        let mut visits = Vec::with_capacity(self.counts.donation_visits);
        for _ in 0..self.counts.donation_visits {
            let donor_id = *donor_ids.choose(rng).expect("validated non-empty");
            visits.push(visit_gen.generate(donor_id, &doctor_ids, &nurse_ids, &facility_ids, rng)?);
        }

        let mut cert_gen = CertificateGenerator::new();
        let cert_donor_ids: Vec<Uuid> = donor_ids
            .choose_multiple(rng, self.counts.certificates)
            .copied()
            .collect();
        let certificates = cert_gen.generate_for(&cert_donor_ids, rng);

        // Junctions
        let nurse_facilities = staff_assignments(&nurse_ids, &facility_ids, rng)
            .into_iter()
            .map(|(nurse_id, facility_id)| GeneratedNurseFacility {
                nurse_id,
                facility_id,
            })
            .collect();

        let doctor_facilities = staff_assignments(&doctor_ids, &facility_ids, rng)
            .into_iter()
            .map(|(doctor_id, facility_id)| GeneratedDoctorFacility {
                doctor_id,
                facility_id,
            })
            .collect();

        let qualified_bag_ids: Vec<Uuid> = visits
            .iter()
            .filter(|v| v.lab_result.is_qualified)
            .map(|v| v.blood_bag.id)
            .collect();
        let blood_bag_orders = deal_bags_to_orders(&orders, &qualified_bag_ids, rng);

        Ok(ScenarioResult {
            users,
            doctors,
            moderators,
            nurses,
            drivers,
            hospitals,
            donors,
            transports,
            orders,
            facilities,
            visits,
            certificates,
            nurse_facilities,
            doctor_facilities,
            blood_bag_orders,
        })
    }

    /// Builds and seeds the scenario into the database.
    pub async fn build(
        self,
        pool: &PgPool,
        rng: &mut impl Rng,
    ) -> Result<ScenarioResult, SeedError> {
        let result = self.build_data(rng)?;

        let seeder = Seeder::new(pool.clone());

        // Seed in dependency order
        seeder.seed_users(&result.users).await?;
        seeder.seed_doctors(&result.doctors).await?;
        seeder.seed_moderators(&result.moderators).await?;
        seeder.seed_nurses(&result.nurses).await?;
        seeder.seed_drivers(&result.drivers).await?;
        seeder.seed_hospitals(&result.hospitals).await?;
        seeder.seed_donors(&result.donors).await?;
        seeder.seed_transports(&result.transports).await?;
        seeder.seed_orders(&result.orders).await?;
        seeder.seed_facilities(&result.facilities).await?;
        seeder.seed_visits(&result.visits).await?;
        seeder.seed_certificates(&result.certificates).await?;
        seeder.seed_nurse_facilities(&result.nurse_facilities).await?;
        seeder
            .seed_doctor_facilities(&result.doctor_facilities)
            .await?;
        seeder
            .seed_blood_bag_orders(&result.blood_bag_orders)
            .await?;

        Ok(result)
    }
}

/// Preset scenarios for common runs.
impl ScenarioBuilder {
    /// The canonical exercise dataset: thousands of users and donors, a
    /// small staff, and one visit per donor on average.
    pub fn database_exercise() -> Self {
        Self::new().with_counts(SeedCounts::default())
    }

    /// A small dataset for quickly checking connectivity and schema fit.
    pub fn smoke_test() -> Self {
        Self::new().with_counts(SeedCounts::smoke())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn small_scenario(rng: &mut impl Rng) -> ScenarioResult {
        ScenarioBuilder::smoke_test().build_data(rng).unwrap()
    }

    #[test]
    fn test_build_data_counts() {
        let mut rng = rand::thread_rng();
        let result = small_scenario(&mut rng);

        let counts = SeedCounts::smoke();
        assert_eq!(result.users.len(), counts.users);
        assert_eq!(result.doctors.len(), counts.doctors);
        assert_eq!(result.donors.len(), counts.donors);
        assert_eq!(result.visits.len(), counts.donation_visits);
        assert_eq!(result.facilities.len(), counts.facilities);
    }

    #[test]
    fn every_foreign_key_references_a_generated_row() {
        let mut rng = rand::thread_rng();
        let result = small_scenario(&mut rng);

        let user_ids: HashSet<Uuid> = result.users.iter().map(|u| u.id).collect();
        let doctor_ids: HashSet<Uuid> = result.doctors.iter().map(|d| d.id).collect();
        let nurse_ids: HashSet<Uuid> = result.nurses.iter().map(|n| n.id).collect();
        let driver_ids: HashSet<Uuid> = result.drivers.iter().map(|d| d.id).collect();
        let hospital_ids: HashSet<Uuid> = result.hospitals.iter().map(|h| h.id).collect();
        let donor_ids: HashSet<Uuid> = result.donors.iter().map(|d| d.id).collect();
        let transport_ids: HashSet<Uuid> = result.transports.iter().map(|t| t.id).collect();
        let facility_ids: HashSet<Uuid> = result.facilities.iter().map(|f| f.id).collect();
        let order_ids: HashSet<Uuid> = result.orders.iter().map(|o| o.id).collect();
        let bag_ids: HashSet<Uuid> = result.visits.iter().map(|v| v.blood_bag.id).collect();

        for doctor in &result.doctors {
            assert!(user_ids.contains(&doctor.user_id));
        }
        for moderator in &result.moderators {
            assert!(user_ids.contains(&moderator.user_id));
        }
        for hospital in &result.hospitals {
            assert!(user_ids.contains(&hospital.user_id));
        }
        for donor in &result.donors {
            assert!(user_ids.contains(&donor.user_id));
        }
        for transport in &result.transports {
            assert!(driver_ids.contains(&transport.driver_id));
        }
        for order in &result.orders {
            assert!(hospital_ids.contains(&order.hospital_id));
            if let Some(transport_id) = order.transport_id {
                assert!(transport_ids.contains(&transport_id));
            }
        }
        for visit in &result.visits {
            assert!(donor_ids.contains(&visit.donation.donor_id));
            assert!(nurse_ids.contains(&visit.donation.nurse_id));
            assert!(donor_ids.contains(&visit.examination.donor_id));
            assert!(doctor_ids.contains(&visit.examination.doctor_id));
            assert!(facility_ids.contains(&visit.blood_bag.facility_id));
        }
        for certificate in &result.certificates {
            assert!(donor_ids.contains(&certificate.donor_id));
        }
        for assignment in &result.nurse_facilities {
            assert!(nurse_ids.contains(&assignment.nurse_id));
            assert!(facility_ids.contains(&assignment.facility_id));
        }
        for assignment in &result.doctor_facilities {
            assert!(doctor_ids.contains(&assignment.doctor_id));
            assert!(facility_ids.contains(&assignment.facility_id));
        }
        for assignment in &result.blood_bag_orders {
            assert!(bag_ids.contains(&assignment.blood_bag_id));
            assert!(order_ids.contains(&assignment.order_id));
        }
    }

    #[test]
    fn assigned_bags_are_qualified() {
        let mut rng = rand::thread_rng();
        let result = small_scenario(&mut rng);

        let qualified: HashSet<Uuid> = result
            .visits
            .iter()
            .filter(|v| v.lab_result.is_qualified)
            .map(|v| v.blood_bag.id)
            .collect();

        for assignment in &result.blood_bag_orders {
            assert!(qualified.contains(&assignment.blood_bag_id));
        }
    }

    #[test]
    fn donors_reference_distinct_users() {
        let mut rng = rand::thread_rng();
        let result = small_scenario(&mut rng);

        let referenced: HashSet<Uuid> = result.donors.iter().map(|d| d.user_id).collect();
        assert_eq!(referenced.len(), result.donors.len());
    }

    #[test]
    fn invalid_counts_are_rejected() {
        let mut rng = rand::thread_rng();
        let counts = SeedCounts {
            facilities: 0,
            ..SeedCounts::smoke()
        };

        let err = ScenarioBuilder::new()
            .with_counts(counts)
            .build_data(&mut rng)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidCounts(_)));
    }

    #[test]
    fn test_preset_database_exercise() {
        let builder = ScenarioBuilder::database_exercise();
        assert_eq!(builder.counts.users, 5000);
        assert_eq!(builder.counts.donors, 2000);
        assert_eq!(builder.counts.donation_visits, 5000);
    }
}
