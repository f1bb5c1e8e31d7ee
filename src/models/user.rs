use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};

pub const CATEGORY_STUDENT: &str = "Student";
pub const CATEGORY_TEACHER: &str = "Teacher";

/// User record as stored in the `Users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// Role: "Student", "Teacher", ...
    pub category: String,
    /// bcrypt hash, never plaintext
    pub password: String,
    /// Sensor slot; devices send it as a number or a numeric string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Bson>,
    #[serde(default)]
    pub courses: Vec<String>,
    pub mobile: Bson,
    /// External (institution) id, distinct from `_id`
    pub id: Bson,
}

/// Registration payload. Everything is optional at the serde level so
/// missing fields become a 400 with our own message instead of a
/// deserializer error.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub password: Option<String>,
    #[schema(value_type = Option<String>)]
    pub fingerprint: Option<Bson>,
    pub courses: Option<Vec<String>>,
    #[schema(value_type = Option<String>)]
    pub mobile: Option<Bson>,
    #[schema(value_type = Option<String>)]
    pub id: Option<Bson>,
}

/// Editable subset of a user. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[schema(value_type = Option<String>)]
    pub mobile: Option<Bson>,
    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FingerprintRequest {
    #[schema(value_type = Option<String>)]
    pub fingerprint: Option<Bson>,
}

/// What a fingerprint scanner gets back for a matched user
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FingerprintMatch {
    pub name: String,
    pub category: String,
    #[schema(value_type = String)]
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
}
