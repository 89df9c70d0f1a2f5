//! Donor merit certificate generation.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use blood_bank::CertificateLevel;

/// Generated certificate ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedCertificate {
    pub id: Uuid,
    pub level: CertificateLevel,
    pub acquisition_date: OffsetDateTime,
    pub donor_id: Uuid,
}

/// Generates certificates, honoring the one-per-(donor, level) constraint.
///
/// A donor drawn twice for the same level keeps the first certificate; the
/// second draw is skipped, which is why fewer certificates than requested
/// can come back.
pub struct CertificateGenerator {
    granted: HashSet<(Uuid, CertificateLevel)>,
}

impl CertificateGenerator {
    pub fn new() -> Self {
        Self {
            granted: HashSet::new(),
        }
    }

    /// Generates at most one certificate per given donor.
    pub fn generate_for(
        &mut self,
        donor_ids: &[Uuid],
        rng: &mut impl Rng,
    ) -> Vec<GeneratedCertificate> {
        let mut certificates = Vec::new();

        for &donor_id in donor_ids {
            let level = *CertificateLevel::ALL.choose(rng).unwrap();
            if !self.granted.insert((donor_id, level)) {
                continue;
            }

            certificates.push(GeneratedCertificate {
                id: Uuid::new_v4(),
                level,
                acquisition_date: OffsetDateTime::now_utc()
                    - Duration::days(rng.gen_range(0..=10000)),
                donor_id,
            });
        }

        certificates
    }
}

impl Default for CertificateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_duplicate_donor_level_pairs() {
        let mut cert_gen = CertificateGenerator::new();
        let mut rng = rand::thread_rng();
        let donors: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();

        // Draw repeatedly for the same donors; pairs must never repeat
        let mut all = Vec::new();
        for _ in 0..10 {
            all.extend(cert_gen.generate_for(&donors, &mut rng));
        }

        let pairs: HashSet<_> = all.iter().map(|c| (c.donor_id, c.level)).collect();
        assert_eq!(pairs.len(), all.len());

        // Ten donors and three levels bound the total
        assert!(all.len() <= 30);
    }

    #[test]
    fn acquisition_dates_are_in_the_past() {
        let mut cert_gen = CertificateGenerator::new();
        let mut rng = rand::thread_rng();
        let donors: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();
        let now = OffsetDateTime::now_utc();

        for cert in cert_gen.generate_for(&donors, &mut rng) {
            assert!(cert.acquisition_date <= now);
        }
    }
}
