//! Donor generation with PESEL numbers and blood groups.

use rand::Rng;
use rand::seq::SliceRandom;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use blood_bank::{BloodGroup, BloodType, Rh, Sex, pesel};

use crate::generators::identity::{self, UniqueSet, UniquenessExhausted};

/// Generated donor ready for database insertion.
///
/// Carries its own name fields for the document variant, where donor
/// documents are self-contained; the relational seeder ignores them.
#[derive(Debug, Clone)]
pub struct GeneratedDonor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub pesel: String,
    pub birth_date: time::Date,
    pub sex: Sex,
    pub blood_group: BloodGroup,
}

/// The person-level part of a donor, independent of how the surrounding
/// schema keys its rows. The document assembler reuses this directly.
#[derive(Debug, Clone)]
pub struct DonorIdentity {
    pub first_name: String,
    pub last_name: String,
    pub pesel: String,
    pub birth_date: time::Date,
    pub sex: Sex,
    pub blood_group: BloodGroup,
}

/// Configuration for donor generation.
#[derive(Debug, Clone)]
pub struct DonorGenConfig {
    /// Minimum donor age in years.
    pub minimum_age: i64,
    /// Maximum donor age in years.
    pub maximum_age: i64,
}

impl Default for DonorGenConfig {
    fn default() -> Self {
        Self {
            minimum_age: 18,
            maximum_age: 65,
        }
    }
}

/// Generates donors with unique, internally consistent PESELs.
pub struct DonorGenerator {
    config: DonorGenConfig,
    pesels: UniqueSet,
}

impl DonorGenerator {
    pub fn new() -> Self {
        Self::with_config(DonorGenConfig::default())
    }

    pub fn with_config(config: DonorGenConfig) -> Self {
        Self {
            config,
            pesels: UniqueSet::new(),
        }
    }

    /// Generates the person-level donor fields with a fresh unique PESEL.
    pub fn generate_identity(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<DonorIdentity, UniquenessExhausted> {
        let sex = if rng.r#gen::<bool>() { Sex::Male } else { Sex::Female };
        let name = identity::person_name(sex, rng);

        let today = OffsetDateTime::now_utc().date();
        let age_days = rng.gen_range(self.config.minimum_age * 365..=self.config.maximum_age * 365);
        let birth_date = today - Duration::days(age_days);

        let pesel = self.pesels.claim_redraw(rng, |r| {
            pesel::generate(birth_date, sex, r).expect("donor birth year fits the PESEL range")
        })?;

        Ok(DonorIdentity {
            first_name: name.first,
            last_name: name.last,
            pesel,
            birth_date,
            sex,
            blood_group: BloodGroup {
                blood_type: *BloodType::ALL.choose(rng).unwrap(),
                rh: *Rh::ALL.choose(rng).unwrap(),
            },
        })
    }

    /// Generates a donor registered to the given user.
    pub fn generate(
        &mut self,
        user_id: Uuid,
        rng: &mut impl Rng,
    ) -> Result<GeneratedDonor, UniquenessExhausted> {
        let person = self.generate_identity(rng)?;

        Ok(GeneratedDonor {
            id: Uuid::new_v4(),
            user_id,
            first_name: person.first_name,
            last_name: person.last_name,
            pesel: person.pesel,
            birth_date: person.birth_date,
            sex: person.sex,
            blood_group: person.blood_group,
        })
    }

    /// Generates one donor per given user id.
    pub fn generate_batch(
        &mut self,
        user_ids: &[Uuid],
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedDonor>, UniquenessExhausted> {
        user_ids
            .iter()
            .map(|&user_id| self.generate(user_id, rng))
            .collect()
    }
}

impl Default for DonorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pesel_matches_birth_date_and_sex() {
        let mut donor_gen = DonorGenerator::new();
        let mut rng = rand::thread_rng();

        for _ in 0..100 {
            let donor = donor_gen.generate(Uuid::new_v4(), &mut rng).unwrap();
            pesel::validate(&donor.pesel).unwrap();
            assert_eq!(pesel::birth_date(&donor.pesel).unwrap(), donor.birth_date);
            assert_eq!(pesel::sex(&donor.pesel).unwrap(), donor.sex);
        }
    }

    #[test]
    fn donors_are_of_age() {
        let mut donor_gen = DonorGenerator::new();
        let mut rng = rand::thread_rng();
        let today = OffsetDateTime::now_utc().date();

        for _ in 0..50 {
            let donor = donor_gen.generate(Uuid::new_v4(), &mut rng).unwrap();
            let age_days = (today - donor.birth_date).whole_days();
            assert!(age_days >= 18 * 365, "underage donor: {age_days} days");
            assert!(age_days <= 66 * 365, "implausibly old donor");
        }
    }

    #[test]
    fn pesels_are_unique_within_a_run() {
        let mut donor_gen = DonorGenerator::new();
        let mut rng = rand::thread_rng();
        let user_ids: Vec<Uuid> = (0..200).map(|_| Uuid::new_v4()).collect();

        let donors = donor_gen.generate_batch(&user_ids, &mut rng).unwrap();
        let pesels: HashSet<_> = donors.iter().map(|d| d.pesel.as_str()).collect();
        assert_eq!(pesels.len(), donors.len());
    }
}
