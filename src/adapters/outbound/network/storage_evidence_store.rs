use super::backend_client::BackendClient;
use crate::ports::outbound::{EvidenceFile, EvidenceStore};
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::Method;

/// Default evidence bucket
pub const DEFAULT_EVIDENCE_BUCKET: &str = "evidence";

/// StorageEvidenceStore adapter for the hosted object storage
///
/// Objects are uploaded to a public bucket; the returned URL is the public
/// download URL of the object.
pub struct StorageEvidenceStore {
    client: BackendClient,
    bucket: String,
}

impl StorageEvidenceStore {
    pub fn new(client: BackendClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn object_key(&self, object_path: &str) -> String {
        let encoded: Vec<String> = object_path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", urlencoding::encode(&self.bucket), encoded.join("/"))
    }

    pub fn public_url(&self, object_path: &str) -> String {
        self.client.url(&format!(
            "/storage/v1/object/public/{}",
            self.object_key(object_path)
        ))
    }
}

#[async_trait]
impl EvidenceStore for StorageEvidenceStore {
    async fn upload(&self, object_path: &str, file: &EvidenceFile) -> Result<String> {
        let path = format!("/storage/v1/object/{}", self.object_key(object_path));
        let response = self
            .client
            .request(Method::POST, &path)
            .header("Content-Type", &file.content_type)
            .header("x-upsert", "false")
            .body(file.bytes.clone())
            .send()
            .await?;
        BackendClient::ensure_success(response, "upload evidence").await?;

        Ok(self.public_url(object_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::network::BackendSettings;

    #[test]
    fn test_public_url() {
        let client = BackendClient::new(BackendSettings {
            base_url: "https://portal.example.com".to_string(),
            api_key: "key".to_string(),
            access_token: None,
        })
        .unwrap();
        let store = StorageEvidenceStore::new(client, DEFAULT_EVIDENCE_BUCKET);

        assert_eq!(
            store.public_url("17/photo 1.png"),
            "https://portal.example.com/storage/v1/object/public/evidence/17/photo%201.png"
        );
    }
}
