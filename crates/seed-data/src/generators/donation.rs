//! Donation visit generation.
//!
//! A visit is the linked group of records one trip to a facility produces:
//! the donation itself, the qualifying examination, the lab result for the
//! drawn blood, and the resulting blood bag.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Distribution, Normal};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::generators::identity::{UniqueSet, UniquenessExhausted};

/// Generated donation ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedDonation {
    pub id: Uuid,
    pub date: OffsetDateTime,
    pub donor_id: Uuid,
    pub nurse_id: Uuid,
}

/// Generated examination ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedExamination {
    pub id: Uuid,
    pub date: OffsetDateTime,
    pub weight: f64,
    pub height: i32,
    pub diastolic_blood_pressure: i32,
    pub systolic_blood_pressure: i32,
    pub is_qualified: bool,
    pub form_number: String,
    pub donor_id: Uuid,
    pub doctor_id: Uuid,
}

/// Generated lab result ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedLabResult {
    pub id: Uuid,
    pub date: OffsetDateTime,
    pub red_cells_count: f64,
    pub white_cells_count: f64,
    pub platelet_count: f64,
    pub hemoglobin_level: f64,
    pub hematocrit_level: f64,
    pub glucose_level: f64,
    pub is_qualified: bool,
}

/// Generated blood bag ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedBloodBag {
    pub id: Uuid,
    pub volume: i32,
    pub donation_id: Uuid,
    pub lab_result_id: Uuid,
    pub facility_id: Uuid,
}

/// All records produced by one donation visit.
#[derive(Debug, Clone)]
pub struct DonationVisit {
    pub donation: GeneratedDonation,
    pub examination: GeneratedExamination,
    pub lab_result: GeneratedLabResult,
    pub blood_bag: GeneratedBloodBag,
}

/// Configuration for visit generation. Measurement ranges follow the
/// screening thresholds the exercise schema checks against.
#[derive(Debug, Clone)]
pub struct VisitGenConfig {
    /// How far back donation dates may reach, in days.
    pub lookback_days: i64,
    /// Mean and standard deviation of donor weight in kilograms.
    pub weight_mean: f64,
    pub weight_std: f64,
    /// Odds of passing qualification, expressed as passes per `fails + 1`.
    pub qualification_odds: u32,
    /// Lab turnaround in days (inclusive range).
    pub lab_delay_days: (i64, i64),
}

impl Default for VisitGenConfig {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            weight_mean: 74.0,
            weight_std: 12.0,
            qualification_odds: 8,
            lab_delay_days: (1, 7),
        }
    }
}

/// Generates donation visits with unique examination form numbers.
pub struct VisitGenerator {
    config: VisitGenConfig,
    form_numbers: UniqueSet,
}

impl VisitGenerator {
    pub fn new() -> Self {
        Self::with_config(VisitGenConfig::default())
    }

    pub fn with_config(config: VisitGenConfig) -> Self {
        Self {
            config,
            form_numbers: UniqueSet::new(),
        }
    }

    /// Generates one full visit for the given donor.
    pub fn generate(
        &mut self,
        donor_id: Uuid,
        doctor_ids: &[Uuid],
        nurse_ids: &[Uuid],
        facility_ids: &[Uuid],
        rng: &mut impl Rng,
    ) -> Result<DonationVisit, UniquenessExhausted> {
        let now = OffsetDateTime::now_utc();
        let donation_date = now - Duration::days(rng.gen_range(1..=self.config.lookback_days));

        let donation = GeneratedDonation {
            id: Uuid::new_v4(),
            date: donation_date,
            donor_id,
            nurse_id: *nurse_ids.choose(rng).expect("visits require nurses"),
        };

        let form_number = self
            .form_numbers
            .claim_redraw(rng, |r| r.gen_range(500_000_000..600_000_000u32).to_string())?;

        let examination = GeneratedExamination {
            id: Uuid::new_v4(),
            date: donation_date,
            weight: self.sample_weight(rng),
            height: rng.gen_range(150..=200),
            diastolic_blood_pressure: rng.gen_range(60..=90),
            systolic_blood_pressure: rng.gen_range(90..=140),
            is_qualified: self.qualification(rng),
            form_number,
            donor_id,
            doctor_id: *doctor_ids.choose(rng).expect("visits require doctors"),
        };

        let lab_date =
            donation_date + Duration::days(rng.gen_range(self.config.lab_delay_days.0..=self.config.lab_delay_days.1));
        let lab_result = GeneratedLabResult {
            id: Uuid::new_v4(),
            date: lab_date.min(now),
            red_cells_count: round2(rng.gen_range(4.0..6.0)),
            white_cells_count: round2(rng.gen_range(4.0..11.0)),
            platelet_count: round2(rng.gen_range(150.0..450.0)),
            hemoglobin_level: round2(rng.gen_range(12.0..18.0)),
            hematocrit_level: round2(rng.gen_range(36.0..52.0)),
            glucose_level: round2(rng.gen_range(70.0..140.0)),
            is_qualified: self.qualification(rng),
        };

        let blood_bag = GeneratedBloodBag {
            id: Uuid::new_v4(),
            volume: rng.gen_range(450..=550),
            donation_id: donation.id,
            lab_result_id: lab_result.id,
            facility_id: *facility_ids.choose(rng).expect("visits require facilities"),
        };

        Ok(DonationVisit {
            donation,
            examination,
            lab_result,
            blood_bag,
        })
    }

    fn sample_weight(&self, rng: &mut impl Rng) -> f64 {
        let normal = Normal::new(self.config.weight_mean, self.config.weight_std).unwrap();
        round2(normal.sample(rng).clamp(50.0, 100.0))
    }

    fn qualification(&self, rng: &mut impl Rng) -> bool {
        rng.gen_range(0..=self.config.qualification_odds) != 0
    }
}

impl Default for VisitGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pools() -> (Vec<Uuid>, Vec<Uuid>, Vec<Uuid>) {
        let doctors: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let nurses: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let facilities: Vec<Uuid> = (0..2).map(|_| Uuid::new_v4()).collect();
        (doctors, nurses, facilities)
    }

    #[test]
    fn visit_links_are_internally_consistent() {
        let mut visit_gen = VisitGenerator::new();
        let mut rng = rand::thread_rng();
        let (doctors, nurses, facilities) = pools();
        let donor_id = Uuid::new_v4();

        let visit = visit_gen
            .generate(donor_id, &doctors, &nurses, &facilities, &mut rng)
            .unwrap();

        assert_eq!(visit.donation.donor_id, donor_id);
        assert_eq!(visit.examination.donor_id, donor_id);
        assert_eq!(visit.blood_bag.donation_id, visit.donation.id);
        assert_eq!(visit.blood_bag.lab_result_id, visit.lab_result.id);
        assert!(doctors.contains(&visit.examination.doctor_id));
        assert!(nurses.contains(&visit.donation.nurse_id));
        assert!(facilities.contains(&visit.blood_bag.facility_id));
    }

    #[test]
    fn measurements_stay_in_clinical_ranges() {
        let mut visit_gen = VisitGenerator::new();
        let mut rng = rand::thread_rng();
        let (doctors, nurses, facilities) = pools();

        for _ in 0..100 {
            let visit = visit_gen
                .generate(Uuid::new_v4(), &doctors, &nurses, &facilities, &mut rng)
                .unwrap();

            let exam = &visit.examination;
            assert!((50.0..=100.0).contains(&exam.weight));
            assert!((150..=200).contains(&exam.height));
            assert!((60..=90).contains(&exam.diastolic_blood_pressure));
            assert!((90..=140).contains(&exam.systolic_blood_pressure));

            let lab = &visit.lab_result;
            assert!((4.0..6.0).contains(&lab.red_cells_count));
            assert!((12.0..18.0).contains(&lab.hemoglobin_level));

            assert!((450..=550).contains(&visit.blood_bag.volume));
        }
    }

    #[test]
    fn lab_result_follows_donation_but_not_into_the_future() {
        let mut visit_gen = VisitGenerator::new();
        let mut rng = rand::thread_rng();
        let (doctors, nurses, facilities) = pools();
        let now = OffsetDateTime::now_utc();

        for _ in 0..100 {
            let visit = visit_gen
                .generate(Uuid::new_v4(), &doctors, &nurses, &facilities, &mut rng)
                .unwrap();
            assert!(visit.lab_result.date >= visit.donation.date);
            assert!(visit.lab_result.date <= now);
        }
    }

    #[test]
    fn form_numbers_are_unique_and_in_range() {
        let mut visit_gen = VisitGenerator::new();
        let mut rng = rand::thread_rng();
        let (doctors, nurses, facilities) = pools();

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let visit = visit_gen
                .generate(Uuid::new_v4(), &doctors, &nurses, &facilities, &mut rng)
                .unwrap();
            let number: u64 = visit.examination.form_number.parse().unwrap();
            assert!((500_000_000..600_000_000).contains(&number));
            assert!(seen.insert(visit.examination.form_number.clone()));
        }
    }
}
