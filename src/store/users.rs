use chrono::{DateTime, Utc};

use crate::auth::hash_token;
use crate::error::{AppError, StoreError};
use crate::store::document::{Database, DbStructure};
use crate::store::models::{RefreshTokenRecord, User, UserId};

fn user_not_found(id: UserId) -> AppError {
    StoreError::NotFound(format!("user {}", id)).into()
}

fn user_mut(document: &mut DbStructure, id: UserId) -> Result<&mut User, AppError> {
    document.users.get_mut(&id).ok_or_else(|| user_not_found(id))
}

impl Database {
    /// Create a user; the email must not belong to anyone yet.
    ///
    /// The uniqueness check and the insert share one critical section.
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let user = self
            .write(|document| {
                if document.users.values().any(|u| u.email == email) {
                    return Err(StoreError::AlreadyExists(format!("user with email {}", email)).into());
                }

                let user = User {
                    id: document.allocate_user_id()?,
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    is_chirpy_red: false,
                    refresh_token: RefreshTokenRecord::default(),
                };
                document.users.insert(user.id, user.clone());
                Ok(user)
            })
            .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        self.read(|document| document.users.get(&id).cloned().ok_or_else(|| user_not_found(id)))
            .await
    }

    /// All users, ordered by id
    pub async fn get_users(&self) -> Result<Vec<User>, AppError> {
        self.read(|document| Ok(document.users.values().cloned().collect()))
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, AppError> {
        self.read(|document| {
            document
                .users
                .values()
                .find(|u| u.email == email)
                .cloned()
                .ok_or_else(|| StoreError::NotFound("user with that email".to_string()).into())
        })
        .await
    }

    /// Find the user currently holding `token`. Cleared tokens never match.
    pub async fn get_user_by_refresh_token(&self, token: &str) -> Result<User, AppError> {
        if token.is_empty() {
            return Err(StoreError::NotFound("user with that refresh token".to_string()).into());
        }

        let token_hash = hash_token(token);
        self.read(|document| {
            document
                .users
                .values()
                .find(|u| u.refresh_token.is_active() && u.refresh_token.token_hash == token_hash)
                .cloned()
                .ok_or_else(|| StoreError::NotFound("user with that refresh token".to_string()).into())
        })
        .await
    }

    /// Replace a user's email and password hash
    pub async fn update_user(
        &self,
        id: UserId,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        self.write(|document| {
            if document.users.values().any(|u| u.id != id && u.email == email) {
                return Err(StoreError::AlreadyExists(format!("user with email {}", email)).into());
            }

            let user = user_mut(document, id)?;
            user.email = email.to_string();
            user.password_hash = password_hash.to_string();
            Ok(user.clone())
        })
        .await
    }

    /// Store `token` as the user's only refresh token, replacing any previous one.
    ///
    /// An empty token clears the record instead.
    pub async fn associate_refresh_token(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let record = if token.is_empty() {
            RefreshTokenRecord::default()
        } else {
            RefreshTokenRecord {
                token_hash: hash_token(token),
                exp: expires_at.timestamp(),
            }
        };

        self.write(|document| {
            let user = user_mut(document, user_id)?;
            if user.refresh_token.is_active() && record.is_active() {
                tracing::debug!(user_id = %user_id, "Replacing existing refresh token");
            }
            user.refresh_token = record;
            Ok(user.clone())
        })
        .await
    }

    pub async fn clear_refresh_token(&self, user_id: UserId) -> Result<User, AppError> {
        let user = self
            .associate_refresh_token(user_id, "", DateTime::<Utc>::UNIX_EPOCH)
            .await?;
        tracing::info!(user_id = %user_id, "Refresh token cleared");
        Ok(user)
    }

    /// Clear `token` from whichever user currently holds it.
    ///
    /// Lookup and clear share one critical section, so a token stored by a
    /// concurrent login is never wiped by revoking an older one.
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<UserId, AppError> {
        if token.is_empty() {
            return Err(StoreError::NotFound("user with that refresh token".to_string()).into());
        }

        let token_hash = hash_token(token);
        let user_id = self
            .write(|document| {
                let user = document
                    .users
                    .values_mut()
                    .find(|u| u.refresh_token.is_active() && u.refresh_token.token_hash == token_hash)
                    .ok_or_else(|| {
                        AppError::from(StoreError::NotFound(
                            "user with that refresh token".to_string(),
                        ))
                    })?;
                user.refresh_token = RefreshTokenRecord::default();
                Ok(user.id)
            })
            .await?;

        tracing::info!(user_id = %user_id, "Refresh token cleared");
        Ok(user_id)
    }

    /// Mark a user as upgraded. Upgrading twice is a no-op.
    pub async fn upgrade_tier(&self, user_id: UserId) -> Result<(), AppError> {
        self.write(|document| {
            let user = user_mut(document, user_id)?;
            user.is_chirpy_red = true;
            Ok(())
        })
        .await?;

        tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use tempfile::TempDir;

    use super::*;
    use crate::auth::{hash_password, verify_password};

    async fn open_store() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("database.json"))
            .await
            .expect("Failed to open store");
        (dir, db)
    }

    #[tokio::test]
    async fn test_create_then_lookup_by_email_verifies_password() {
        let (_dir, db) = open_store().await;
        let hash = hash_password("04234").unwrap();

        let created = db.create_user("walt@breakingbad.com", &hash).await.unwrap();
        let found = db.get_user_by_email("walt@breakingbad.com").await.unwrap();

        assert_eq!(created, found);
        assert!(verify_password("04234", &found.password_hash).is_ok());
        assert!(verify_password("04235", &found.password_hash).is_err());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (_dir, db) = open_store().await;

        db.create_user("a@x.com", "h1").await.unwrap();
        let err = db.create_user("a@x.com", "h2").await.unwrap_err();

        assert!(matches!(err, AppError::Store(StoreError::AlreadyExists(_))));
        let users = db.get_users().await.unwrap();
        assert_eq!(users.iter().filter(|u| u.email == "a@x.com").count(), 1);
        assert_eq!(users[0].password_hash, "h1");
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let (_dir, db) = open_store().await;

        db.create_user("a@x.com", "h").await.unwrap();
        assert!(db.create_user("A@x.com", "h").await.is_ok());
        assert!(db.get_user_by_email("A@X.COM").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_concurrent_signups_with_same_email() {
        let (_dir, db) = open_store().await;
        let db = Arc::new(db);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { db.create_user("race@x.com", "h").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(db.get_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_order() {
        let (_dir, db) = open_store().await;

        let first = db.create_user("one@x.com", "h").await.unwrap();
        let second = db.create_user("two@x.com", "h").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(db.get_user(2).await.unwrap().email, "two@x.com");
    }

    #[tokio::test]
    async fn test_missing_user() {
        let (_dir, db) = open_store().await;

        assert!(db.get_user(99).await.unwrap_err().is_not_found());
        assert!(db.update_user(99, "a@x.com", "h").await.unwrap_err().is_not_found());
        assert!(db.upgrade_tier(99).await.unwrap_err().is_not_found());
        assert!(db.clear_refresh_token(99).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_user_replaces_fields() {
        let (_dir, db) = open_store().await;
        let user = db.create_user("old@x.com", "old-hash").await.unwrap();

        let updated = db.update_user(user.id, "new@x.com", "new-hash").await.unwrap();

        assert_eq!(updated.email, "new@x.com");
        assert_eq!(updated.password_hash, "new-hash");
        assert!(db.get_user_by_email("old@x.com").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_user_to_taken_email() {
        let (_dir, db) = open_store().await;
        db.create_user("taken@x.com", "h").await.unwrap();
        let user = db.create_user("mine@x.com", "h").await.unwrap();

        let err = db.update_user(user.id, "taken@x.com", "h").await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::AlreadyExists(_))));

        // keeping one's own email is fine
        assert!(db.update_user(user.id, "mine@x.com", "h2").await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_token_lookup_and_overwrite() {
        let (_dir, db) = open_store().await;
        let user = db.create_user("a@x.com", "h").await.unwrap();
        let expires_at = Utc::now() + Duration::days(60);

        db.associate_refresh_token(user.id, "first-token", expires_at).await.unwrap();
        assert_eq!(db.get_user_by_refresh_token("first-token").await.unwrap().id, user.id);

        db.associate_refresh_token(user.id, "second-token", expires_at).await.unwrap();
        assert!(db.get_user_by_refresh_token("first-token").await.unwrap_err().is_not_found());
        assert_eq!(db.get_user_by_refresh_token("second-token").await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_refresh_token_is_stored_hashed() {
        let (_dir, db) = open_store().await;
        let user = db.create_user("a@x.com", "h").await.unwrap();
        let expires_at = Utc::now() + Duration::days(60);

        let stored = db.associate_refresh_token(user.id, "plain-token", expires_at).await.unwrap();

        assert_eq!(stored.refresh_token.token_hash, hash_token("plain-token"));
        assert_eq!(stored.refresh_token.exp, expires_at.timestamp());
        let raw = std::fs::read_to_string(db.path()).unwrap();
        assert!(!raw.contains("plain-token"));
    }

    #[tokio::test]
    async fn test_clear_refresh_token() {
        let (_dir, db) = open_store().await;
        let user = db.create_user("a@x.com", "h").await.unwrap();
        db.associate_refresh_token(user.id, "token", Utc::now() + Duration::days(1))
            .await
            .unwrap();

        let cleared = db.clear_refresh_token(user.id).await.unwrap();

        assert_eq!(cleared.refresh_token, RefreshTokenRecord::default());
        assert!(db.get_user_by_refresh_token("token").await.unwrap_err().is_not_found());
        assert!(db.get_user_by_refresh_token("").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_revoke_refresh_token_only_clears_matching_token() {
        let (_dir, db) = open_store().await;
        let user = db.create_user("a@x.com", "h").await.unwrap();
        let expires_at = Utc::now() + Duration::days(1);
        db.associate_refresh_token(user.id, "old", expires_at).await.unwrap();
        db.associate_refresh_token(user.id, "new", expires_at).await.unwrap();

        assert!(db.revoke_refresh_token("old").await.unwrap_err().is_not_found());
        assert_eq!(db.get_user_by_refresh_token("new").await.unwrap().id, user.id);

        assert_eq!(db.revoke_refresh_token("new").await.unwrap(), user.id);
        assert!(db.get_user_by_refresh_token("new").await.unwrap_err().is_not_found());
        assert!(db.revoke_refresh_token("").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_upgrade_tier_is_idempotent() {
        let (_dir, db) = open_store().await;
        let user = db.create_user("a@x.com", "h").await.unwrap();
        assert!(!user.is_chirpy_red);

        db.upgrade_tier(user.id).await.unwrap();
        db.upgrade_tier(user.id).await.unwrap();

        assert!(db.get_user(user.id).await.unwrap().is_chirpy_red);
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.json");

        {
            let db = Database::new(&path).await.unwrap();
            db.create_user("a@x.com", "h").await.unwrap();
        }

        let reopened = Database::new(&path).await.unwrap();
        assert_eq!(reopened.get_user(1).await.unwrap().email, "a@x.com");
        assert_eq!(reopened.create_user("b@x.com", "h").await.unwrap().id, 2);
    }
}
