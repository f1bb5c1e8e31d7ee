mod repository;
#[cfg(test)]
pub mod memory;

pub use repository::Repository;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use crate::config::Config;
use crate::models::{
    User, CATEGORY_STUDENT, EVENT_COURSE_FIELD, ROSTER_FIELD, SNAPSHOT_COURSE_FIELD,
    SNAPSHOT_STUDENT_FIELD,
};
use crate::utils::AppError;

pub const USERS: &str = "Users";
pub const REGISTRATIONS: &str = "newReg";
pub const ATTENDANCE: &str = "attendance";
pub const STUDENT_INFO: &str = "studentInfo";
pub const COURSES: &str = "courses";

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(&config.database_url).await?;

        client_options.app_name = Some("attendance-service".to_string());
        client_options.max_pool_size = Some(config.max_pool_size);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database_name);

        let mongodb = Self { client, db };

        // Test connection
        mongodb.ping().await?;

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the route filters rely on
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        // A legacy database may already hold duplicate emails; keep serving.
        match self.collection::<Document>(USERS).create_index(unique_email).await {
            Ok(_) => log::info!("   ✅ Index created: Users(email, unique)"),
            Err(e) => log::warn!("   ⚠️  Could not create unique Users(email) index: {}", e),
        }

        let plain_indexes = [
            (USERS, "fingerprint"),
            (STUDENT_INFO, SNAPSHOT_COURSE_FIELD),
            (STUDENT_INFO, SNAPSHOT_STUDENT_FIELD),
            (ATTENDANCE, EVENT_COURSE_FIELD),
        ];

        for (collection, field) in plain_indexes {
            let index = IndexModel::builder().keys(doc! { field: 1 }).build();

            match self.collection::<Document>(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}({})", collection, field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    async fn find_all(&self, collection: &str, filter: Document) -> Result<Vec<Document>, AppError> {
        let cursor = self.collection::<Document>(collection).find(filter).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }
}

fn students_in_course_filter(course_name: &str) -> Document {
    doc! {
        "category": CATEGORY_STUDENT,
        "courses": { "$in": [course_name] },
    }
}

#[async_trait]
impl Repository for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.client.database("admin").run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<Document>, AppError> {
        self.find_all(COURSES, doc! {}).await
    }

    async fn push_course(&self, course_name: &str) -> Result<(), AppError> {
        let result = self
            .collection::<Document>(COURSES)
            .update_one(doc! {}, doc! { "$push": { ROSTER_FIELD: course_name } })
            .upsert(true)
            .await?;

        if result.matched_count > 0 || result.upserted_id.is_some() {
            Ok(())
        } else {
            Err(AppError::DatabaseError("Course roster was not updated".to_string()))
        }
    }

    async fn insert_registration(&self, registration: Document) -> Result<(), AppError> {
        self.collection::<Document>(REGISTRATIONS).insert_one(registration).await?;
        Ok(())
    }

    async fn list_registrations(&self) -> Result<Vec<Document>, AppError> {
        self.find_all(REGISTRATIONS, doc! {}).await
    }

    async fn clear_registrations(&self) -> Result<u64, AppError> {
        let result = self.collection::<Document>(REGISTRATIONS).delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, AppError> {
        let result = self.collection::<User>(USERS).insert_one(user).await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError("Inserted user has no ObjectId".to_string()))
    }

    async fn list_users(&self) -> Result<Vec<Document>, AppError> {
        self.find_all(USERS, doc! {}).await
    }

    async fn user_fingerprints(&self) -> Result<Vec<Bson>, AppError> {
        let cursor = self
            .collection::<Document>(USERS)
            .find(doc! {})
            .projection(doc! { "fingerprint": 1 })
            .await?;

        let docs: Vec<Document> = cursor.try_collect().await?;

        Ok(docs
            .into_iter()
            .map(|mut doc| doc.remove("fingerprint").unwrap_or(Bson::Null))
            .collect())
    }

    async fn delete_user(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Document>(USERS).delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn update_user(&self, id: ObjectId, changes: Document) -> Result<bool, AppError> {
        let result = self
            .collection::<Document>(USERS)
            .update_one(doc! { "_id": id }, doc! { "$set": changes })
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<Document>, AppError> {
        Ok(self.collection::<Document>(USERS).find_one(doc! { "email": email }).await?)
    }

    async fn find_user_by_fingerprint(&self, fingerprint: &Bson) -> Result<Option<Document>, AppError> {
        Ok(self
            .collection::<Document>(USERS)
            .find_one(doc! { "fingerprint": fingerprint.clone() })
            .await?)
    }

    async fn students_in_course(&self, course_name: &str) -> Result<Vec<Document>, AppError> {
        self.find_all(USERS, students_in_course_filter(course_name)).await
    }

    async fn insert_attendance(&self, event: Document) -> Result<(), AppError> {
        self.collection::<Document>(ATTENDANCE).insert_one(event).await?;
        Ok(())
    }

    async fn attendance_for_course(&self, course: &str) -> Result<Vec<Document>, AppError> {
        self.find_all(ATTENDANCE, doc! { EVENT_COURSE_FIELD: course }).await
    }

    async fn delete_snapshots_for_course(&self, course_name: &str) -> Result<u64, AppError> {
        let result = self
            .collection::<Document>(STUDENT_INFO)
            .delete_many(doc! { SNAPSHOT_COURSE_FIELD: course_name })
            .await?;
        Ok(result.deleted_count)
    }

    async fn insert_snapshots(&self, snapshots: Vec<Document>) -> Result<u64, AppError> {
        if snapshots.is_empty() {
            return Ok(0);
        }

        let result = self.collection::<Document>(STUDENT_INFO).insert_many(snapshots).await?;
        Ok(result.inserted_ids.len() as u64)
    }

    async fn snapshots_for_student(&self, student_id: &str) -> Result<Vec<Document>, AppError> {
        self.find_all(STUDENT_INFO, doc! { SNAPSHOT_STUDENT_FIELD: student_id }).await
    }
}
