use crate::authorization::ensure_chirp_owner;
use crate::error::{AppError, StoreError};
use crate::store::document::Database;
use crate::store::models::{Chirp, ChirpId, SortOrder, UserId};

fn chirp_not_found(id: ChirpId) -> AppError {
    StoreError::NotFound(format!("chirp {}", id)).into()
}

impl Database {
    /// Store a chirp verbatim; the body is expected to be validated and masked already.
    pub async fn create_chirp(&self, body: &str, author_id: UserId) -> Result<Chirp, AppError> {
        let chirp = self
            .write(|document| {
                let chirp = Chirp {
                    id: document.allocate_chirp_id()?,
                    body: body.to_string(),
                    author_id,
                };
                document.chirps.insert(chirp.id, chirp.clone());
                Ok(chirp)
            })
            .await?;

        tracing::info!(chirp_id = %chirp.id, author_id = %author_id, "Chirp created");
        Ok(chirp)
    }

    /// List chirps, optionally only those of one author, ordered by id
    pub async fn get_chirps(
        &self,
        author_id: Option<UserId>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, AppError> {
        self.read(|document| {
            // map iteration is already ascending by id
            let matching = document
                .chirps
                .values()
                .filter(|c| author_id.map_or(true, |author| c.author_id == author))
                .cloned();

            let chirps = match order {
                SortOrder::Ascending => matching.collect(),
                SortOrder::Descending => matching.rev().collect(),
            };
            Ok(chirps)
        })
        .await
    }

    pub async fn get_chirp(&self, id: ChirpId) -> Result<Chirp, AppError> {
        self.read(|document| document.chirps.get(&id).cloned().ok_or_else(|| chirp_not_found(id)))
            .await
    }

    /// Delete a chirp on behalf of `requester_id`.
    ///
    /// Existence is checked before ownership: a missing chirp is `NotFound`
    /// for everyone.
    pub async fn delete_chirp(&self, id: ChirpId, requester_id: UserId) -> Result<(), AppError> {
        self.write(|document| {
            let chirp = document.chirps.get(&id).ok_or_else(|| chirp_not_found(id))?;
            ensure_chirp_owner(chirp, requester_id)?;
            document.chirps.remove(&id);
            Ok(())
        })
        .await?;

        tracing::info!(chirp_id = %id, "Chirp deleted");
        Ok(())
    }
}
