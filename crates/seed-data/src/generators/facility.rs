//! Hospitals, donation facilities, and staff-to-facility assignments.

use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;
use uuid::Uuid;

use crate::generators::identity::{self, phone_candidate};

/// Generated hospital ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedHospital {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: String,
}

/// Generated donation facility ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedFacility {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
}

/// Nurse-to-facility staffing row.
#[derive(Debug, Clone)]
pub struct GeneratedNurseFacility {
    pub nurse_id: Uuid,
    pub facility_id: Uuid,
}

/// Doctor-to-facility staffing row.
#[derive(Debug, Clone)]
pub struct GeneratedDoctorFacility {
    pub doctor_id: Uuid,
    pub facility_id: Uuid,
}

/// Generates hospitals owned by a distinct random subset of users.
pub fn generate_hospitals(
    user_ids: &[Uuid],
    count: usize,
    rng: &mut impl Rng,
) -> Vec<GeneratedHospital> {
    user_ids
        .choose_multiple(rng, count)
        .map(|&user_id| {
            let city = identity::CITIES.choose(rng).unwrap();
            GeneratedHospital {
                id: Uuid::new_v4(),
                user_id,
                name: format!("Szpital {city}"),
                address: identity::street_address(rng),
            }
        })
        .collect()
}

/// Generates donation facilities with distinct facility numbers.
pub fn generate_facilities(count: usize, rng: &mut impl Rng) -> Vec<GeneratedFacility> {
    // Facility numbers are drawn without replacement from 100-999 so names
    // and emails do not collide.
    let numbers = index::sample(rng, 900, count.min(900));

    numbers
        .iter()
        .map(|offset| {
            let number = 100 + offset;
            GeneratedFacility {
                id: Uuid::new_v4(),
                name: format!("Placówka Donacji {number}"),
                address: identity::street_address(rng),
                email: format!("placowka{number}@krew.pl"),
                phone_number: phone_candidate(rng),
            }
        })
        .collect()
}

/// Assigns each staff member to 1-3 distinct facilities.
///
/// Returns `(member_id, facility_id)` pairs with no duplicates.
pub fn staff_assignments(
    member_ids: &[Uuid],
    facility_ids: &[Uuid],
    rng: &mut impl Rng,
) -> Vec<(Uuid, Uuid)> {
    if facility_ids.is_empty() {
        return Vec::new();
    }

    let mut assignments = Vec::new();
    for &member_id in member_ids {
        let wanted = rng.gen_range(1..=3usize);
        for &facility_id in facility_ids.choose_multiple(rng, wanted.min(facility_ids.len())) {
            assignments.push((member_id, facility_id));
        }
    }
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn facility_numbers_are_distinct() {
        let mut rng = rand::thread_rng();
        let facilities = generate_facilities(50, &mut rng);

        assert_eq!(facilities.len(), 50);
        let names: HashSet<_> = facilities.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names.len(), facilities.len());

        for facility in &facilities {
            assert!(facility.email.starts_with("placowka"));
            assert!(facility.email.ends_with("@krew.pl"));
        }
    }

    #[test]
    fn staff_assignments_are_unique_pairs() {
        let mut rng = rand::thread_rng();
        let members: Vec<Uuid> = (0..30).map(|_| Uuid::new_v4()).collect();
        let facilities: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

        let assignments = staff_assignments(&members, &facilities, &mut rng);

        let pairs: HashSet<_> = assignments.iter().collect();
        assert_eq!(pairs.len(), assignments.len());

        // Every member got between one and three facilities
        for &member in &members {
            let count = assignments.iter().filter(|(m, _)| *m == member).count();
            assert!((1..=3).contains(&count), "member has {count} facilities");
        }
    }

    #[test]
    fn no_assignments_without_facilities() {
        let mut rng = rand::thread_rng();
        let members: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        assert!(staff_assignments(&members, &[], &mut rng).is_empty());
    }
}
