//! Document model for the MongoDB variant of the schema.
//!
//! The document database denormalizes aggressively: donors embed their
//! examinations, facilities embed staff summaries, orders embed the hospital
//! they belong to, and blood bags embed the donation they came from. The
//! structs here serialize to exactly the shapes the exercise schema expects.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::{BloodType, Rh, Sex};

/// Name of the database the document variant populates.
pub const DATABASE_NAME: &str = "krwiodawcy";

/// Collection names, in insertion order.
pub mod collections {
    pub const USERS: &str = "users";
    pub const DOCTORS: &str = "doctors";
    pub const DONORS: &str = "donors";
    pub const MODERATORS: &str = "moderators";
    pub const HOSPITALS: &str = "hospitals";
    pub const DRIVERS: &str = "drivers";
    pub const NURSES: &str = "nurses";
    pub const FACILITIES: &str = "facilities";
    pub const ORDERS: &str = "orders";
    pub const BLOOD_BAGS: &str = "blood_bags";
}

/// Account document. `profiles` starts empty and is filled by a second pass
/// once the role documents exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub password: String,
    pub profiles: Vec<RoleProfile>,
    pub phone_number: String,
    pub login: String,
    pub email: String,
}

/// Role entry pushed onto a user's `profiles` array.
///
/// Serializes as `{"role": "doctor", "doctor_id": <id>}` and so on, the id
/// field name varying with the role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleProfile {
    Doctor { doctor_id: ObjectId },
    Donor { donor_id: ObjectId },
    Moderator { moderator_id: ObjectId },
    Hospital { hospital_id: ObjectId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub name: String,
    pub last_name: String,
    pub facilities: Vec<ObjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub examinations: Vec<EmbeddedExamination>,
    pub birth_date: bson::DateTime,
    pub sex: Sex,
    pub blood_type: BloodType,
    // The collection schema spells the field this way.
    #[serde(rename = "blod_rh")]
    pub blood_rh: Rh,
    pub name: String,
    pub last_name: String,
    pub pesel: String,
}

/// Examination embedded in a donor document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedExamination {
    pub date: bson::DateTime,
    pub weight: f64,
    pub height: f64,
    pub is_qualified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeratorDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurseDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub last_name: String,
    pub phone_number: String,
}

/// Facility with embedded staff summaries. `available_blood_bags` starts
/// empty and is set after blood bags are inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub doctors: Vec<DoctorSummary>,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub available_blood_bags: Vec<ObjectId>,
    pub nurses: Vec<NurseSummary>,
    pub email: String,
}

/// Doctor summary embedded in a facility document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub user_id: ObjectId,
    pub name: String,
    pub last_name: String,
}

/// Nurse summary embedded in a facility document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurseSummary {
    pub name: String,
    pub last_name: String,
    pub phone_number: String,
    pub nurse_id: ObjectId,
}

/// Order state vocabulary of the document schema, which distinguishes
/// partial completion and spells cancellation with a double l.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrderState {
    PartiallyCompleted,
    Completed,
    Awaiting,
    Cancelled,
}

impl DocumentOrderState {
    pub const ALL: [DocumentOrderState; 4] = [
        DocumentOrderState::PartiallyCompleted,
        DocumentOrderState::Completed,
        DocumentOrderState::Awaiting,
        DocumentOrderState::Cancelled,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub is_urgent: bool,
    pub state: DocumentOrderState,
    pub hospital: HospitalSummary,
    pub realizations: Vec<Realization>,
}

/// Hospital summary embedded in an order document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalSummary {
    pub address: String,
    pub user_id: ObjectId,
    pub name: String,
    pub hospital_id: ObjectId,
}

/// One delivery run attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realization {
    pub date: bson::DateTime,
    pub transport: Transport,
    pub blood_bags: Vec<ObjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    pub driver_id: ObjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodBagDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub volume: f64,
    pub donation: DonationSummary,
    pub facility_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_result: Option<LabResultSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ObjectId>,
}

/// Donation embedded in a blood bag document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationSummary {
    pub date: bson::DateTime,
    pub donor_id: ObjectId,
    pub nurse_id: ObjectId,
}

/// Lab result embedded in a blood bag document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabResultSummary {
    pub date: bson::DateTime,
    pub is_qualified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_profile_serializes_with_role_tag() {
        let id = ObjectId::new();
        let profile = RoleProfile::Doctor { doctor_id: id };
        let doc = bson::to_document(&profile).unwrap();

        assert_eq!(doc.get_str("role").unwrap(), "doctor");
        assert_eq!(doc.get_object_id("doctor_id").unwrap(), id);
    }

    #[test]
    fn donor_document_uses_schema_field_names() {
        let donor = DonorDocument {
            id: ObjectId::new(),
            user_id: ObjectId::new(),
            examinations: Vec::new(),
            birth_date: bson::DateTime::from_millis(0),
            sex: Sex::Female,
            blood_type: BloodType::Ab,
            blood_rh: Rh::Plus,
            name: "Anna".into(),
            last_name: "Nowak".into(),
            pesel: "70010112345".into(),
        };
        let doc = bson::to_document(&donor).unwrap();

        assert!(doc.contains_key("_id"));
        assert_eq!(doc.get_str("blod_rh").unwrap(), "+");
        assert_eq!(doc.get_str("blood_type").unwrap(), "AB");
        assert_eq!(doc.get_str("sex").unwrap(), "Female");
    }

    #[test]
    fn blood_bag_omits_absent_optionals() {
        let bag = BloodBagDocument {
            id: ObjectId::new(),
            volume: 450.0,
            donation: DonationSummary {
                date: bson::DateTime::from_millis(0),
                donor_id: ObjectId::new(),
                nurse_id: ObjectId::new(),
            },
            facility_id: ObjectId::new(),
            lab_result: None,
            order: None,
        };
        let doc = bson::to_document(&bag).unwrap();

        assert!(!doc.contains_key("lab_result"));
        assert!(!doc.contains_key("order"));
    }

    #[test]
    fn document_order_state_spelling() {
        assert_eq!(
            bson::to_bson(&DocumentOrderState::PartiallyCompleted).unwrap(),
            bson::Bson::String("partially_completed".into())
        );
        assert_eq!(
            bson::to_bson(&DocumentOrderState::Cancelled).unwrap(),
            bson::Bson::String("cancelled".into())
        );
    }
}
