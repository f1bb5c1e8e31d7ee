use bcrypt::{hash, verify};
use mongodb::bson::Document;

use crate::database::Repository;
use crate::models::CredentialsRequest;
use crate::services::user_service::without_password;
use crate::utils::AppError;

// bcrypt is CPU-bound; keep it off the async workers
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(password, cost)).await??;
    Ok(hashed)
}

async fn verify_password(password: String, stored: String) -> Result<bool, AppError> {
    let valid = tokio::task::spawn_blocking(move || verify(password, &stored)).await?;

    match valid {
        Ok(valid) => Ok(valid),
        Err(e) => {
            // Not a bcrypt hash (e.g. a legacy plaintext row): never a match
            log::warn!("⚠️  Stored password is not a valid bcrypt hash: {}", e);
            Ok(false)
        }
    }
}

/// Checks email/password and returns the user record without its hash
pub async fn authenticate(repo: &dyn Repository, request: CredentialsRequest) -> Result<Document, AppError> {
    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => (email, password),
        _ => return Err(AppError::InvalidRequest("Email and password are required".to_string())),
    };

    let user = match repo.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            log::info!("Authentication failed for email: {}", email);
            return Err(AppError::Unauthorized("Authentication failed".to_string()));
        }
    };

    let stored = user.get_str("password").unwrap_or_default().to_string();

    if !verify_password(password, stored).await? {
        log::info!("Authentication failed for email: {}", email);
        return Err(AppError::Unauthorized("Authentication failed".to_string()));
    }

    log::info!("Authentication successful for email: {}", email);

    Ok(without_password(user))
}
