//! Relational seeding utilities.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::builders::ScenarioError;
use crate::generators::{
    DonationVisit, GeneratedBloodBagOrder, GeneratedCertificate, GeneratedDoctor,
    GeneratedDoctorFacility, GeneratedDonor, GeneratedDriver, GeneratedFacility,
    GeneratedHospital, GeneratedModerator, GeneratedNurse, GeneratedNurseFacility, GeneratedOrder,
    GeneratedTransport, GeneratedUser,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Generation error: {0}")]
    Generation(#[from] ScenarioError),
}

/// Database seeder for inserting generated data.
pub struct Seeder {
    pool: PgPool,
    batch_size: usize,
}

impl Seeder {
    /// Creates a new seeder with the given database pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            batch_size: 500,
        }
    }

    /// Sets the batch size for bulk operations.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Seeds users into the database.
    pub async fn seed_users(&self, users: &[GeneratedUser]) -> Result<(), SeedError> {
        info!("Seeding {} users...", users.len());

        for chunk in users.chunks(self.batch_size) {
            for user in chunk {
                sqlx::query(
                    r#"
                    INSERT INTO users (id, first_name, last_name, login, email, password, phone_number)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (id) DO NOTHING
                    "#,
                )
                .bind(user.id)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.login)
                .bind(&user.email)
                .bind(&user.password)
                .bind(&user.phone_number)
                .execute(&self.pool)
                .await?;
            }
        }

        info!("Seeded {} users", users.len());
        Ok(())
    }

    /// Seeds doctor role rows.
    pub async fn seed_doctors(&self, doctors: &[GeneratedDoctor]) -> Result<(), SeedError> {
        info!("Seeding {} doctors...", doctors.len());

        for doctor in doctors {
            sqlx::query(
                r#"
                INSERT INTO doctors (id, fk_user_id)
                VALUES ($1, $2)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(doctor.id)
            .bind(doctor.user_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} doctors", doctors.len());
        Ok(())
    }

    /// Seeds moderator role rows.
    pub async fn seed_moderators(
        &self,
        moderators: &[GeneratedModerator],
    ) -> Result<(), SeedError> {
        info!("Seeding {} moderators...", moderators.len());

        for moderator in moderators {
            sqlx::query(
                r#"
                INSERT INTO moderators (id, fk_user_id)
                VALUES ($1, $2)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(moderator.id)
            .bind(moderator.user_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} moderators", moderators.len());
        Ok(())
    }

    /// Seeds nurses.
    pub async fn seed_nurses(&self, nurses: &[GeneratedNurse]) -> Result<(), SeedError> {
        info!("Seeding {} nurses...", nurses.len());

        for nurse in nurses {
            sqlx::query(
                r#"
                INSERT INTO nurses (id, first_name, last_name, phone_number)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(nurse.id)
            .bind(&nurse.first_name)
            .bind(&nurse.last_name)
            .bind(&nurse.phone_number)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} nurses", nurses.len());
        Ok(())
    }

    /// Seeds hospitals.
    pub async fn seed_hospitals(&self, hospitals: &[GeneratedHospital]) -> Result<(), SeedError> {
        info!("Seeding {} hospitals...", hospitals.len());

        for hospital in hospitals {
            sqlx::query(
                r#"
                INSERT INTO hospitals (id, name, address, fk_user_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(hospital.id)
            .bind(&hospital.name)
            .bind(&hospital.address)
            .bind(hospital.user_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} hospitals", hospitals.len());
        Ok(())
    }

    /// Seeds donors with their blood group composite.
    pub async fn seed_donors(&self, donors: &[GeneratedDonor]) -> Result<(), SeedError> {
        info!("Seeding {} donors...", donors.len());

        for chunk in donors.chunks(self.batch_size) {
            for donor in chunk {
                sqlx::query(
                    r#"
                    INSERT INTO donors (id, pesel, birth_date, sex, blood_info, fk_user_id)
                    VALUES ($1, $2, $3, $4, ROW($5, $6)::blood_info, $7)
                    ON CONFLICT (id) DO NOTHING
                    "#,
                )
                .bind(donor.id)
                .bind(&donor.pesel)
                .bind(donor.birth_date)
                .bind(donor.sex.as_str())
                .bind(donor.blood_group.blood_type.as_str())
                .bind(donor.blood_group.rh.as_str())
                .bind(donor.user_id)
                .execute(&self.pool)
                .await?;
            }
        }

        info!("Seeded {} donors", donors.len());
        Ok(())
    }

    /// Seeds drivers.
    pub async fn seed_drivers(&self, drivers: &[GeneratedDriver]) -> Result<(), SeedError> {
        info!("Seeding {} drivers...", drivers.len());

        for driver in drivers {
            sqlx::query(
                r#"
                INSERT INTO drivers (id, first_name, last_name)
                VALUES ($1, $2, $3)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(driver.id)
            .bind(&driver.first_name)
            .bind(&driver.last_name)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} drivers", drivers.len());
        Ok(())
    }

    /// Seeds transports.
    pub async fn seed_transports(
        &self,
        transports: &[GeneratedTransport],
    ) -> Result<(), SeedError> {
        info!("Seeding {} transports...", transports.len());

        for transport in transports {
            sqlx::query(
                r#"
                INSERT INTO transports (id, fk_driver_id)
                VALUES ($1, $2)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(transport.id)
            .bind(transport.driver_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} transports", transports.len());
        Ok(())
    }

    /// Seeds blood orders.
    pub async fn seed_orders(&self, orders: &[GeneratedOrder]) -> Result<(), SeedError> {
        info!("Seeding {} orders...", orders.len());

        for order in orders {
            sqlx::query(
                r#"
                INSERT INTO orders (id, date, state, is_urgent, fk_transport_id, fk_hospital_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(order.id)
            .bind(order.date)
            .bind(order.state)
            .bind(order.is_urgent)
            .bind(order.transport_id)
            .bind(order.hospital_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} orders", orders.len());
        Ok(())
    }

    /// Seeds donation facilities.
    pub async fn seed_facilities(
        &self,
        facilities: &[GeneratedFacility],
    ) -> Result<(), SeedError> {
        info!("Seeding {} facilities...", facilities.len());

        for facility in facilities {
            sqlx::query(
                r#"
                INSERT INTO facilities (id, name, address, email, phone_number)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(facility.id)
            .bind(&facility.name)
            .bind(&facility.address)
            .bind(&facility.email)
            .bind(&facility.phone_number)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} facilities", facilities.len());
        Ok(())
    }

    /// Seeds donation visits: donation, examination, lab result, and blood
    /// bag per visit.
    pub async fn seed_visits(&self, visits: &[DonationVisit]) -> Result<(), SeedError> {
        info!("Seeding {} donation visits...", visits.len());

        for (i, visit) in visits.iter().enumerate() {
            self.insert_visit(visit).await?;

            if (i + 1) % self.batch_size == 0 {
                info!("  Seeded {}/{} visits", i + 1, visits.len());
            }
        }

        info!("Seeded {} donation visits", visits.len());
        Ok(())
    }

    /// Inserts the four linked records of a single visit.
    async fn insert_visit(&self, visit: &DonationVisit) -> Result<(), SeedError> {
        let donation = &visit.donation;
        sqlx::query(
            r#"
            INSERT INTO donations (id, date, fk_donor_id, fk_nurse_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(donation.id)
        .bind(donation.date)
        .bind(donation.donor_id)
        .bind(donation.nurse_id)
        .execute(&self.pool)
        .await?;

        let exam = &visit.examination;
        sqlx::query(
            r#"
            INSERT INTO examinations (
                id, date, weight, height, diastolic_blood_pressure, systolic_blood_pressure,
                is_qualified, form_number, fk_donor_id, fk_doctor_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(exam.id)
        .bind(exam.date)
        .bind(exam.weight)
        .bind(exam.height)
        .bind(exam.diastolic_blood_pressure)
        .bind(exam.systolic_blood_pressure)
        .bind(exam.is_qualified)
        .bind(&exam.form_number)
        .bind(exam.donor_id)
        .bind(exam.doctor_id)
        .execute(&self.pool)
        .await?;

        let lab = &visit.lab_result;
        sqlx::query(
            r#"
            INSERT INTO lab_results (
                id, date, red_cells_count, white_cells_count, platelet_count,
                hemoglobin_level, hematocrit_level, glucose_level, is_qualified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(lab.id)
        .bind(lab.date)
        .bind(lab.red_cells_count)
        .bind(lab.white_cells_count)
        .bind(lab.platelet_count)
        .bind(lab.hemoglobin_level)
        .bind(lab.hematocrit_level)
        .bind(lab.glucose_level)
        .bind(lab.is_qualified)
        .execute(&self.pool)
        .await?;

        let bag = &visit.blood_bag;
        sqlx::query(
            r#"
            INSERT INTO blood_bags (id, volume, fk_donation_id, fk_lab_results_id, fk_facility_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(bag.id)
        .bind(bag.volume)
        .bind(bag.donation_id)
        .bind(bag.lab_result_id)
        .bind(bag.facility_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Seeds donor merit certificates.
    pub async fn seed_certificates(
        &self,
        certificates: &[GeneratedCertificate],
    ) -> Result<(), SeedError> {
        info!("Seeding {} certificates...", certificates.len());

        for certificate in certificates {
            sqlx::query(
                r#"
                INSERT INTO certificates (id, level, acquisition_date, fk_donor_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(certificate.id)
            .bind(certificate.level.as_str())
            .bind(certificate.acquisition_date)
            .bind(certificate.donor_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} certificates", certificates.len());
        Ok(())
    }

    /// Seeds nurse-to-facility staffing rows.
    pub async fn seed_nurse_facilities(
        &self,
        assignments: &[GeneratedNurseFacility],
    ) -> Result<(), SeedError> {
        info!("Seeding {} nurse-facility assignments...", assignments.len());

        for assignment in assignments {
            sqlx::query(
                r#"
                INSERT INTO nurses_facilities (fk_nurse_id, fk_facility_id)
                VALUES ($1, $2)
                ON CONFLICT (fk_nurse_id, fk_facility_id) DO NOTHING
                "#,
            )
            .bind(assignment.nurse_id)
            .bind(assignment.facility_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} nurse-facility assignments", assignments.len());
        Ok(())
    }

    /// Seeds doctor-to-facility staffing rows.
    pub async fn seed_doctor_facilities(
        &self,
        assignments: &[GeneratedDoctorFacility],
    ) -> Result<(), SeedError> {
        info!(
            "Seeding {} doctor-facility assignments...",
            assignments.len()
        );

        for assignment in assignments {
            sqlx::query(
                r#"
                INSERT INTO doctors_facilities (fk_doctor_id, fk_facility_id)
                VALUES ($1, $2)
                ON CONFLICT (fk_doctor_id, fk_facility_id) DO NOTHING
                "#,
            )
            .bind(assignment.doctor_id)
            .bind(assignment.facility_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} doctor-facility assignments", assignments.len());
        Ok(())
    }

    /// Seeds blood-bag-to-order fulfillment rows.
    pub async fn seed_blood_bag_orders(
        &self,
        assignments: &[GeneratedBloodBagOrder],
    ) -> Result<(), SeedError> {
        info!("Seeding {} blood bag assignments...", assignments.len());

        for assignment in assignments {
            sqlx::query(
                r#"
                INSERT INTO blood_bags_orders (fk_blood_bag_id, fk_order_id)
                VALUES ($1, $2)
                ON CONFLICT (fk_blood_bag_id, fk_order_id) DO NOTHING
                "#,
            )
            .bind(assignment.blood_bag_id)
            .bind(assignment.order_id)
            .execute(&self.pool)
            .await?;
        }

        info!("Seeded {} blood bag assignments", assignments.len());
        Ok(())
    }

    /// Clears all seeded data.
    ///
    /// **WARNING**: This deletes all data from the tables. Use with caution.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        info!("Clearing all seeded data...");

        // Order matters due to foreign key constraints
        sqlx::query("DELETE FROM blood_bags_orders")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM nurses_facilities")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM doctors_facilities")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM certificates")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM blood_bags")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM lab_results")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM examinations")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM donations")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM orders")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM transports")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM facilities")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM hospitals")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM donors")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM moderators")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM nurses")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM doctors")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM drivers")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await?;

        info!("All data cleared");
        Ok(())
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
