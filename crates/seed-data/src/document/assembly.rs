//! In-memory assembly of the document-store dataset.
//!
//! All documents are built (with client-generated ObjectIds) before anything
//! touches the database, so every cross-document reference points at a
//! document that already exists in the batch.

use bson::oid::ObjectId;
use rand::Rng;
use rand::seq::SliceRandom;
use time::{Date, Duration, OffsetDateTime};

use blood_bank::documents::{
    BloodBagDocument, DoctorDocument, DoctorSummary, DocumentOrderState, DonationSummary,
    DonorDocument, DriverDocument, EmbeddedExamination, FacilityDocument, HospitalDocument,
    HospitalSummary, LabResultSummary, ModeratorDocument, NurseDocument, NurseSummary,
    OrderDocument, Realization, Transport, UserDocument,
};

use crate::builders::ScenarioError;
use crate::config::DocumentSeedCounts;
use crate::generators::identity::{self, fold_diacritics, phone_candidate};
use crate::generators::{DonorGenerator, UserGenerator};

/// The fully assembled document dataset, ready for insertion.
#[derive(Debug)]
pub struct DocumentData {
    pub users: Vec<UserDocument>,
    pub doctors: Vec<DoctorDocument>,
    pub donors: Vec<DonorDocument>,
    pub moderators: Vec<ModeratorDocument>,
    pub hospitals: Vec<HospitalDocument>,
    pub drivers: Vec<DriverDocument>,
    pub nurses: Vec<NurseDocument>,
    pub facilities: Vec<FacilityDocument>,
    pub orders: Vec<OrderDocument>,
    pub blood_bags: Vec<BloodBagDocument>,
}

/// Probability that an order is urgent in the document dataset.
const URGENT_PROBABILITY: f64 = 0.3;
/// Probability that a blood bag's lab result is qualified.
const LAB_QUALIFIED_PROBABILITY: f64 = 0.8;
/// Earliest date order realizations reach back to.
const REALIZATION_EPOCH: Date = match Date::from_ordinal_date(2020, 1) {
    Ok(date) => date,
    Err(_) => panic!("valid constant date"),
};

/// Builds the complete document dataset for the given counts.
pub fn build_documents(
    counts: &DocumentSeedCounts,
    rng: &mut impl Rng,
) -> Result<DocumentData, ScenarioError> {
    counts.validate().map_err(ScenarioError::InvalidCounts)?;

    let now = OffsetDateTime::now_utc();

    // Accounts; profiles are back-filled after the role documents exist
    let mut user_gen = UserGenerator::new();
    let users: Vec<UserDocument> = user_gen
        .generate_batch(counts.users, rng)?
        .into_iter()
        .map(|user| UserDocument {
            id: ObjectId::new(),
            password: user.password,
            profiles: Vec::new(),
            phone_number: user.phone_number,
            login: user.login,
            email: user.email,
        })
        .collect();
    let user_ids: Vec<ObjectId> = users.iter().map(|u| u.id).collect();

    // Role documents sample users with replacement
    let doctors: Vec<DoctorDocument> = (0..counts.doctors)
        .map(|_| {
            let name = identity::any_person_name(rng);
            DoctorDocument {
                id: ObjectId::new(),
                user_id: *user_ids.choose(rng).unwrap(),
                name: name.first,
                last_name: name.last,
                facilities: Vec::new(),
            }
        })
        .collect();

    let mut donor_gen = DonorGenerator::new();
    let donors: Vec<DonorDocument> = (0..counts.donors)
        .map(|_| {
            let person = donor_gen.generate_identity(rng)?;
            let examinations = embedded_examinations(person.birth_date, now, rng);

            Ok(DonorDocument {
                id: ObjectId::new(),
                user_id: *user_ids.choose(rng).unwrap(),
                examinations,
                birth_date: to_bson_datetime(midnight(person.birth_date)),
                sex: person.sex,
                blood_type: person.blood_group.blood_type,
                blood_rh: person.blood_group.rh,
                name: person.first_name,
                last_name: person.last_name,
                pesel: person.pesel,
            })
        })
        .collect::<Result<_, ScenarioError>>()?;

    let moderators: Vec<ModeratorDocument> = (0..counts.moderators)
        .map(|_| {
            let name = identity::any_person_name(rng);
            ModeratorDocument {
                id: ObjectId::new(),
                user_id: *user_ids.choose(rng).unwrap(),
                name: name.first,
                last_name: name.last,
            }
        })
        .collect();

    let hospitals: Vec<HospitalDocument> = (0..counts.hospitals)
        .map(|_| {
            let city = identity::CITIES.choose(rng).unwrap();
            HospitalDocument {
                id: ObjectId::new(),
                user_id: *user_ids.choose(rng).unwrap(),
                name: format!("Szpital {city}"),
                address: identity::street_address(rng),
            }
        })
        .collect();

    let drivers: Vec<DriverDocument> = (0..counts.drivers)
        .map(|_| {
            let name = identity::any_person_name(rng);
            DriverDocument {
                id: ObjectId::new(),
                name: name.first,
                last_name: name.last,
            }
        })
        .collect();

    let nurses: Vec<NurseDocument> = (0..counts.nurses)
        .map(|_| {
            let name = identity::any_person_name(rng);
            NurseDocument {
                id: ObjectId::new(),
                name: name.first,
                last_name: name.last,
                phone_number: phone_candidate(rng),
            }
        })
        .collect();

    // Facilities embed summaries of already-built personnel
    let facilities: Vec<FacilityDocument> = (0..counts.facilities)
        .map(|_| {
            let doctor_count = rng.gen_range(1..=5usize).min(doctors.len());
            let nurse_count = rng.gen_range(1..=5usize).min(nurses.len());

            let embedded_doctors = doctors
                .choose_multiple(rng, doctor_count)
                .map(|d| DoctorSummary {
                    user_id: d.user_id,
                    name: d.name.clone(),
                    last_name: d.last_name.clone(),
                })
                .collect();
            let embedded_nurses = nurses
                .choose_multiple(rng, nurse_count)
                .map(|n| NurseSummary {
                    name: n.name.clone(),
                    last_name: n.last_name.clone(),
                    phone_number: n.phone_number.clone(),
                    nurse_id: n.id,
                })
                .collect();

            let city = identity::CITIES.choose(rng).unwrap();
            FacilityDocument {
                id: ObjectId::new(),
                doctors: embedded_doctors,
                name: format!("Centrum Krwiodawstwa {city}"),
                address: identity::street_address(rng),
                phone_number: phone_candidate(rng),
                available_blood_bags: Vec::new(),
                nurses: embedded_nurses,
                email: format!(
                    "centrum.{}{}@krew.pl",
                    fold_diacritics(&city.to_lowercase()),
                    rng.gen_range(1..10000)
                ),
            }
        })
        .collect();

    let driver_ids: Vec<ObjectId> = drivers.iter().map(|d| d.id).collect();
    let orders: Vec<OrderDocument> = (0..counts.orders)
        .map(|_| {
            let hospital = hospitals.choose(rng).unwrap();
            let realizations = (0..rng.gen_range(0..=3))
                .map(|_| Realization {
                    date: to_bson_datetime(datetime_between(
                        midnight(REALIZATION_EPOCH),
                        now,
                        rng,
                    )),
                    transport: Transport {
                        driver_id: *driver_ids.choose(rng).unwrap(),
                    },
                    blood_bags: Vec::new(),
                })
                .collect();

            OrderDocument {
                id: ObjectId::new(),
                is_urgent: rng.r#gen::<f64>() < URGENT_PROBABILITY,
                state: *DocumentOrderState::ALL.choose(rng).unwrap(),
                hospital: HospitalSummary {
                    address: hospital.address.clone(),
                    user_id: hospital.user_id,
                    name: hospital.name.clone(),
                    hospital_id: hospital.id,
                },
                realizations,
            }
        })
        .collect();

    let facility_ids: Vec<ObjectId> = facilities.iter().map(|f| f.id).collect();
    let nurse_ids: Vec<ObjectId> = nurses.iter().map(|n| n.id).collect();
    let order_ids: Vec<ObjectId> = orders.iter().map(|o| o.id).collect();
    let blood_bags: Vec<BloodBagDocument> = (0..counts.blood_bags)
        .map(|_| {
            let donor = donors.choose(rng).unwrap();
            let donation_date =
                datetime_between(donor.birth_date.to_time_0_3(), now, rng);
            let lab_date = donation_date + Duration::days(rng.gen_range(1..=7));

            BloodBagDocument {
                id: ObjectId::new(),
                volume: *[300.0, 350.0, 450.0, 500.0].choose(rng).unwrap(),
                donation: DonationSummary {
                    date: to_bson_datetime(donation_date),
                    donor_id: donor.id,
                    nurse_id: *nurse_ids.choose(rng).unwrap(),
                },
                facility_id: *facility_ids.choose(rng).unwrap(),
                lab_result: Some(LabResultSummary {
                    date: to_bson_datetime(lab_date),
                    is_qualified: rng.r#gen::<f64>() < LAB_QUALIFIED_PROBABILITY,
                }),
                order: if rng.r#gen::<bool>() {
                    order_ids.choose(rng).copied()
                } else {
                    None
                },
            }
        })
        .collect();

    Ok(DocumentData {
        users,
        doctors,
        donors,
        moderators,
        hospitals,
        drivers,
        nurses,
        facilities,
        orders,
        blood_bags,
    })
}

/// Generates the 1-5 examinations embedded in a donor document.
fn embedded_examinations(
    birth_date: Date,
    now: OffsetDateTime,
    rng: &mut impl Rng,
) -> Vec<EmbeddedExamination> {
    (0..rng.gen_range(1..=5))
        .map(|_| EmbeddedExamination {
            date: to_bson_datetime(datetime_between(midnight(birth_date), now, rng)),
            weight: round1(rng.gen_range(50.0..100.0)),
            height: round1(rng.gen_range(150.0..200.0)),
            is_qualified: rng.r#gen::<bool>(),
        })
        .collect()
}

/// Picks a random midnight between the two instants (whole-day resolution).
fn datetime_between(
    start: OffsetDateTime,
    end: OffsetDateTime,
    rng: &mut impl Rng,
) -> OffsetDateTime {
    let span_days = (end.date() - start.date()).whole_days().max(0);
    let date = start.date() + Duration::days(rng.gen_range(0..=span_days));
    midnight(date)
}

fn midnight(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}

fn to_bson_datetime(value: OffsetDateTime) -> bson::DateTime {
    bson::DateTime::from_time_0_3(value)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn build_smoke(rng: &mut impl Rng) -> DocumentData {
        build_documents(&DocumentSeedCounts::smoke(), rng).unwrap()
    }

    #[test]
    fn counts_are_honored() {
        let mut rng = rand::thread_rng();
        let data = build_smoke(&mut rng);
        let counts = DocumentSeedCounts::smoke();

        assert_eq!(data.users.len(), counts.users);
        assert_eq!(data.doctors.len(), counts.doctors);
        assert_eq!(data.donors.len(), counts.donors);
        assert_eq!(data.orders.len(), counts.orders);
        assert_eq!(data.blood_bags.len(), counts.blood_bags);
    }

    #[test]
    fn every_reference_points_at_a_built_document() {
        let mut rng = rand::thread_rng();
        let data = build_smoke(&mut rng);

        let user_ids: HashSet<ObjectId> = data.users.iter().map(|u| u.id).collect();
        let donor_ids: HashSet<ObjectId> = data.donors.iter().map(|d| d.id).collect();
        let nurse_ids: HashSet<ObjectId> = data.nurses.iter().map(|n| n.id).collect();
        let driver_ids: HashSet<ObjectId> = data.drivers.iter().map(|d| d.id).collect();
        let facility_ids: HashSet<ObjectId> = data.facilities.iter().map(|f| f.id).collect();
        let hospital_ids: HashSet<ObjectId> = data.hospitals.iter().map(|h| h.id).collect();
        let order_ids: HashSet<ObjectId> = data.orders.iter().map(|o| o.id).collect();

        for doctor in &data.doctors {
            assert!(user_ids.contains(&doctor.user_id));
        }
        for donor in &data.donors {
            assert!(user_ids.contains(&donor.user_id));
        }
        for order in &data.orders {
            assert!(hospital_ids.contains(&order.hospital.hospital_id));
            assert!(user_ids.contains(&order.hospital.user_id));
            for realization in &order.realizations {
                assert!(driver_ids.contains(&realization.transport.driver_id));
            }
        }
        for bag in &data.blood_bags {
            assert!(donor_ids.contains(&bag.donation.donor_id));
            assert!(nurse_ids.contains(&bag.donation.nurse_id));
            assert!(facility_ids.contains(&bag.facility_id));
            if let Some(order) = bag.order {
                assert!(order_ids.contains(&order));
            }
        }
    }

    #[test]
    fn donors_embed_one_to_five_examinations() {
        let mut rng = rand::thread_rng();
        let data = build_smoke(&mut rng);

        for donor in &data.donors {
            assert!((1..=5).contains(&donor.examinations.len()));
            for exam in &donor.examinations {
                assert!(exam.date >= donor.birth_date);
            }
        }
    }

    #[test]
    fn facility_embeds_reference_existing_personnel() {
        let mut rng = rand::thread_rng();
        let data = build_smoke(&mut rng);

        let nurse_ids: HashSet<ObjectId> = data.nurses.iter().map(|n| n.id).collect();
        let doctor_user_ids: HashSet<ObjectId> =
            data.doctors.iter().map(|d| d.user_id).collect();

        for facility in &data.facilities {
            assert!((1..=5).contains(&facility.doctors.len()));
            assert!((1..=5).contains(&facility.nurses.len()));
            assert!(facility.available_blood_bags.is_empty());

            for doctor in &facility.doctors {
                assert!(doctor_user_ids.contains(&doctor.user_id));
            }
            for nurse in &facility.nurses {
                assert!(nurse_ids.contains(&nurse.nurse_id));
            }
        }
    }

    #[test]
    fn bag_lab_results_follow_donations() {
        let mut rng = rand::thread_rng();
        let data = build_smoke(&mut rng);

        for bag in &data.blood_bags {
            let lab = bag.lab_result.as_ref().expect("assembler always fills lab results");
            assert!(lab.date > bag.donation.date);
        }
    }
}
