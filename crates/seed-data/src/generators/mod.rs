//! Entity generators for seeding data.
//!
//! This module provides generators for the entities of the blood donation
//! schema:
//! - [`UserGenerator`]: accounts with unique logins, emails, and phones
//! - [`DonorGenerator`]: donors with valid, unique PESELs
//! - [`VisitGenerator`]: donation + examination + lab result + blood bag
//! - [`OrderGenerator`]: hospital blood orders
//! - [`CertificateGenerator`]: donor merit certificates
//!
//! Role rows (doctors, moderators), personnel (nurses, drivers), and the
//! facility/hospital rows are simple enough to be free functions.

pub mod certificate;
pub mod donation;
pub mod donor;
pub mod facility;
pub mod identity;
pub mod order;
pub mod staff;
pub mod user;

pub use certificate::{CertificateGenerator, GeneratedCertificate};
pub use donation::{
    DonationVisit, GeneratedBloodBag, GeneratedDonation, GeneratedExamination, GeneratedLabResult,
    VisitGenConfig, VisitGenerator,
};
pub use donor::{DonorGenConfig, DonorGenerator, DonorIdentity, GeneratedDonor};
pub use facility::{
    GeneratedDoctorFacility, GeneratedFacility, GeneratedHospital, GeneratedNurseFacility,
    generate_facilities, generate_hospitals, staff_assignments,
};
pub use identity::{UniqueSet, UniquenessExhausted};
pub use order::{
    GeneratedBloodBagOrder, GeneratedOrder, GeneratedTransport, OrderGenConfig, OrderGenerator,
    deal_bags_to_orders, generate_transports,
};
pub use staff::{
    GeneratedDoctor, GeneratedDriver, GeneratedModerator, GeneratedNurse, assign_doctors,
    assign_moderators, generate_drivers, generate_nurses,
};
pub use user::{GeneratedUser, UserGenerator};
