//! MongoDB seeding utilities.

use bson::oid::ObjectId;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::Database;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use blood_bank::documents::{RoleProfile, collections};

use crate::builders::ScenarioError;
use crate::document::assembly::DocumentData;

#[derive(Debug, Error)]
pub enum DocumentSeedError {
    #[error("MongoDB error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    Bson(#[from] bson::ser::Error),
    #[error("Generation error: {0}")]
    Generation(#[from] ScenarioError),
}

/// Per-collection insert counts from a document seeding run.
#[derive(Debug, Clone)]
pub struct DocumentSeedSummary {
    pub users: usize,
    pub doctors: usize,
    pub donors: usize,
    pub moderators: usize,
    pub hospitals: usize,
    pub drivers: usize,
    pub nurses: usize,
    pub facilities: usize,
    pub orders: usize,
    pub blood_bags: usize,
}

/// One row of a per-blood-group aggregation.
#[derive(Debug, Clone)]
pub struct BloodGroupCount {
    pub blood_group: String,
    pub count: i64,
}

/// Document database seeder for inserting assembled document data.
pub struct DocumentSeeder {
    db: Database,
    chunk_size: usize,
}

impl DocumentSeeder {
    /// Creates a new seeder over the given database handle.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            chunk_size: 1000,
        }
    }

    /// Sets the chunk size for bulk inserts.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Seeds the full dataset: purges the collections, inserts everything in
    /// dependency order, then applies the denormalized back-references.
    pub async fn seed(
        &self,
        data: &DocumentData,
        rng: &mut impl Rng,
    ) -> Result<DocumentSeedSummary, DocumentSeedError> {
        self.clear_all().await?;

        self.insert_chunked(collections::USERS, &data.users).await?;
        self.insert_chunked(collections::DOCTORS, &data.doctors)
            .await?;
        self.insert_chunked(collections::DONORS, &data.donors)
            .await?;
        self.insert_chunked(collections::MODERATORS, &data.moderators)
            .await?;
        self.insert_chunked(collections::HOSPITALS, &data.hospitals)
            .await?;
        self.insert_chunked(collections::DRIVERS, &data.drivers)
            .await?;
        self.insert_chunked(collections::NURSES, &data.nurses)
            .await?;
        self.insert_chunked(collections::FACILITIES, &data.facilities)
            .await?;
        self.insert_chunked(collections::ORDERS, &data.orders)
            .await?;
        self.insert_chunked(collections::BLOOD_BAGS, &data.blood_bags)
            .await?;

        self.set_available_blood_bags(data, rng).await?;
        self.push_role_profiles(data).await?;

        Ok(DocumentSeedSummary {
            users: data.users.len(),
            doctors: data.doctors.len(),
            donors: data.donors.len(),
            moderators: data.moderators.len(),
            hospitals: data.hospitals.len(),
            drivers: data.drivers.len(),
            nurses: data.nurses.len(),
            facilities: data.facilities.len(),
            orders: data.orders.len(),
            blood_bags: data.blood_bags.len(),
        })
    }

    /// Purges every collection the seeder writes to.
    pub async fn clear_all(&self) -> Result<(), DocumentSeedError> {
        info!("Clearing all collections...");

        for name in [
            collections::BLOOD_BAGS,
            collections::ORDERS,
            collections::FACILITIES,
            collections::NURSES,
            collections::DRIVERS,
            collections::HOSPITALS,
            collections::MODERATORS,
            collections::DONORS,
            collections::DOCTORS,
            collections::USERS,
        ] {
            self.db
                .collection::<Document>(name)
                .delete_many(doc! {}, None)
                .await?;
        }

        info!("All collections cleared");
        Ok(())
    }

    /// Inserts documents in chunks to keep individual insert commands small.
    async fn insert_chunked<T: Serialize + Send + Sync>(
        &self,
        name: &str,
        documents: &[T],
    ) -> Result<(), DocumentSeedError> {
        info!("Inserting {} documents into {}...", documents.len(), name);

        let collection = self.db.collection::<T>(name);
        for chunk in documents.chunks(self.chunk_size) {
            collection.insert_many(chunk, None).await?;
        }

        info!("Inserted {} documents into {}", documents.len(), name);
        Ok(())
    }

    /// Sets each facility's `available_blood_bags` to a random subset of the
    /// bags stored there.
    async fn set_available_blood_bags(
        &self,
        data: &DocumentData,
        rng: &mut impl Rng,
    ) -> Result<(), DocumentSeedError> {
        info!("Updating facility blood bag availability...");

        let facilities = self.db.collection::<Document>(collections::FACILITIES);

        for facility in &data.facilities {
            let stored: Vec<ObjectId> = data
                .blood_bags
                .iter()
                .filter(|bag| bag.facility_id == facility.id)
                .map(|bag| bag.id)
                .collect();

            let available_count = rng.gen_range(0..=stored.len());
            let available: Vec<ObjectId> = stored
                .choose_multiple(rng, available_count)
                .copied()
                .collect();

            facilities
                .update_one(
                    doc! { "_id": facility.id },
                    doc! { "$set": { "available_blood_bags": bson::to_bson(&available)? } },
                    None,
                )
                .await?;
        }

        info!("Facilities updated with available blood bags");
        Ok(())
    }

    /// Pushes a `{role, <role>_id}` profile entry onto each referenced user.
    async fn push_role_profiles(&self, data: &DocumentData) -> Result<(), DocumentSeedError> {
        info!("Pushing role profiles onto users...");

        let mut pushed = 0usize;
        for doctor in &data.doctors {
            self.push_profile(doctor.user_id, RoleProfile::Doctor { doctor_id: doctor.id })
                .await?;
            pushed += 1;
        }
        for donor in &data.donors {
            self.push_profile(donor.user_id, RoleProfile::Donor { donor_id: donor.id })
                .await?;
            pushed += 1;
        }
        for moderator in &data.moderators {
            self.push_profile(
                moderator.user_id,
                RoleProfile::Moderator {
                    moderator_id: moderator.id,
                },
            )
            .await?;
            pushed += 1;
        }
        for hospital in &data.hospitals {
            self.push_profile(
                hospital.user_id,
                RoleProfile::Hospital {
                    hospital_id: hospital.id,
                },
            )
            .await?;
            pushed += 1;
        }

        info!("Pushed {pushed} role profiles");
        Ok(())
    }

    async fn push_profile(
        &self,
        user_id: ObjectId,
        profile: RoleProfile,
    ) -> Result<(), DocumentSeedError> {
        self.db
            .collection::<Document>(collections::USERS)
            .update_one(
                doc! { "_id": user_id },
                doc! { "$push": { "profiles": bson::to_bson(&profile)? } },
                None,
            )
            .await?;
        Ok(())
    }

    /// Counts donors per blood group, least common first.
    pub async fn donors_per_blood_group(
        &self,
    ) -> Result<Vec<BloodGroupCount>, DocumentSeedError> {
        let pipeline = vec![
            doc! { "$group": {
                "_id": { "blood_type": "$blood_type", "blood_rh": "$blod_rh" },
                "donor_count": { "$sum": 1 },
            }},
            doc! { "$project": {
                "_id": 0,
                "blood_group": { "$concat": ["$_id.blood_type", "$_id.blood_rh"] },
                "donor_count": 1,
            }},
            doc! { "$sort": { "donor_count": 1 } },
        ];

        self.run_blood_group_pipeline(collections::DONORS, pipeline, "donor_count")
            .await
    }

    /// Counts qualified, still-unassigned blood bags per blood group.
    pub async fn available_bags_per_blood_group(
        &self,
    ) -> Result<Vec<BloodGroupCount>, DocumentSeedError> {
        let pipeline = vec![
            doc! { "$match": {
                "lab_result.is_qualified": true,
                "order": { "$exists": false },
            }},
            doc! { "$lookup": {
                "from": collections::DONORS,
                "localField": "donation.donor_id",
                "foreignField": "_id",
                "as": "donor",
            }},
            doc! { "$unwind": "$donor" },
            doc! { "$group": {
                "_id": { "blood_type": "$donor.blood_type", "blood_rh": "$donor.blod_rh" },
                "available_bags": { "$sum": 1 },
            }},
            doc! { "$project": {
                "_id": 0,
                "blood_group": { "$concat": ["$_id.blood_type", "$_id.blood_rh"] },
                "available_bags": 1,
            }},
            doc! { "$sort": { "available_bags": 1 } },
        ];

        self.run_blood_group_pipeline(collections::BLOOD_BAGS, pipeline, "available_bags")
            .await
    }

    async fn run_blood_group_pipeline(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
        count_field: &str,
    ) -> Result<Vec<BloodGroupCount>, DocumentSeedError> {
        let mut cursor = self
            .db
            .collection::<Document>(collection)
            .aggregate(pipeline, None)
            .await?;

        let mut rows = Vec::new();
        while let Some(row) = cursor.try_next().await? {
            let blood_group = row.get_str("blood_group").unwrap_or_default().to_string();
            let count = row
                .get_i64(count_field)
                .or_else(|_| row.get_i32(count_field).map(i64::from))
                .unwrap_or_default();
            rows.push(BloodGroupCount { blood_group, count });
        }

        Ok(rows)
    }

    /// Returns a reference to the database handle for advanced usage.
    pub fn database(&self) -> &Database {
        &self.db
    }
}
