//! Medical and logistics staff generation: doctors, moderators, nurses,
//! and drivers.

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::generators::identity::{self, phone_candidate};

/// Doctor role row referencing an existing user.
#[derive(Debug, Clone)]
pub struct GeneratedDoctor {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// Moderator role row referencing an existing user.
#[derive(Debug, Clone)]
pub struct GeneratedModerator {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// Generated nurse ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedNurse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

/// Generated driver ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedDriver {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// Promotes a distinct random subset of users to doctors.
pub fn assign_doctors(
    user_ids: &[Uuid],
    count: usize,
    rng: &mut impl Rng,
) -> Vec<GeneratedDoctor> {
    user_ids
        .choose_multiple(rng, count)
        .map(|&user_id| GeneratedDoctor {
            id: Uuid::new_v4(),
            user_id,
        })
        .collect()
}

/// Promotes a distinct random subset of users to moderators.
pub fn assign_moderators(
    user_ids: &[Uuid],
    count: usize,
    rng: &mut impl Rng,
) -> Vec<GeneratedModerator> {
    user_ids
        .choose_multiple(rng, count)
        .map(|&user_id| GeneratedModerator {
            id: Uuid::new_v4(),
            user_id,
        })
        .collect()
}

/// Generates standalone nurse rows.
pub fn generate_nurses(count: usize, rng: &mut impl Rng) -> Vec<GeneratedNurse> {
    (0..count)
        .map(|_| {
            let name = identity::any_person_name(rng);
            GeneratedNurse {
                id: Uuid::new_v4(),
                first_name: name.first,
                last_name: name.last,
                phone_number: phone_candidate(rng),
            }
        })
        .collect()
}

/// Generates standalone driver rows.
pub fn generate_drivers(count: usize, rng: &mut impl Rng) -> Vec<GeneratedDriver> {
    (0..count)
        .map(|_| {
            let name = identity::any_person_name(rng);
            GeneratedDriver {
                id: Uuid::new_v4(),
                first_name: name.first,
                last_name: name.last,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn doctors_reference_distinct_users() {
        let mut rng = rand::thread_rng();
        let user_ids: Vec<Uuid> = (0..50).map(|_| Uuid::new_v4()).collect();

        let doctors = assign_doctors(&user_ids, 20, &mut rng);
        assert_eq!(doctors.len(), 20);

        let referenced: HashSet<_> = doctors.iter().map(|d| d.user_id).collect();
        assert_eq!(referenced.len(), doctors.len());
        assert!(referenced.iter().all(|id| user_ids.contains(id)));
    }

    #[test]
    fn role_count_is_capped_by_user_pool() {
        let mut rng = rand::thread_rng();
        let user_ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

        let moderators = assign_moderators(&user_ids, 20, &mut rng);
        assert_eq!(moderators.len(), 5);
    }

    #[test]
    fn nurses_have_phone_numbers() {
        let mut rng = rand::thread_rng();
        let nurses = generate_nurses(10, &mut rng);

        assert_eq!(nurses.len(), 10);
        for nurse in &nurses {
            assert_eq!(nurse.phone_number.len(), 9);
            assert!(!nurse.first_name.is_empty());
        }
    }
}
