//! Photo uploads.

use finquina_integrations::StoredBlob;

use crate::error::ActionError;
use crate::farm::Farm;

/// Message for an upload with no content.
pub const NO_FILE: &str = "No file provided";

impl Farm {
    /// Store an uploaded file under a unique name.
    pub async fn store_upload(&self, name: &str, bytes: &[u8]) -> Result<StoredBlob, ActionError> {
        if bytes.is_empty() {
            return Err(ActionError::Invalid(NO_FILE.to_owned()));
        }
        let blob = self.blobs.put(name, bytes).await?;
        tracing::info!(url = %blob.url, size = bytes.len(), "Upload stored");
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::offline_farm;

    use super::*;

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        assert!(matches!(
            farm.store_upload("foto.jpg", &[]).await,
            Err(ActionError::Invalid(ref m)) if m == NO_FILE
        ));
    }

    #[tokio::test]
    async fn upload_lands_in_the_store() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let stored = farm.store_upload("mi foto.jpg", b"jpeg").await;
        assert!(stored.is_ok_and(|b| b.url.starts_with("/uploads/")
            && b.filename.ends_with("mi_foto.jpg")
            && farm.blobs().owns(&b.url)));
    }
}
