//! services/api/src/adapters/upload.rs
//!
//! This module contains the adapter for the Cloudinary image host. It
//! implements the `ImageHostService` port from the `core` crate.
//!
//! Cloudinary authenticates signed uploads with a SHA-1 digest over the
//! request parameters. The string-to-sign must match the provider's
//! expectation exactly, field order included.

use async_trait::async_trait;
use bugvault_core::ports::{ImageHostService, PortError, PortResult};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::time::{SystemTime, UNIX_EPOCH};

/// All screenshots land in one fixed folder on the provider side.
const UPLOAD_FOLDER: &str = "bug-screenshots";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `ImageHostService` port using Cloudinary's
/// signed upload endpoint.
#[derive(Clone)]
pub struct CloudinaryAdapter {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryAdapter {
    /// Creates a new `CloudinaryAdapter`.
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name,
            api_key,
            api_secret,
        }
    }

    /// The provider's signature: hex SHA-1 over the sorted parameter string
    /// with the API secret appended.
    fn sign(string_to_sign: &str, api_secret: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(string_to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn string_to_sign(timestamp: u64) -> String {
        format!("folder={}&timestamp={}", UPLOAD_FOLDER, timestamp)
    }
}

//=========================================================================================
// `ImageHostService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageHostService for CloudinaryAdapter {
    /// Uploads the file and returns its public HTTPS URL.
    async fn upload_image(&self, file_name: &str, data: Vec<u8>) -> PortResult<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .as_secs();

        let signature = Self::sign(&Self::string_to_sign(timestamp), &self.api_secret);

        let file_part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature)
            .text("folder", UPLOAD_FOLDER);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            return Err(PortError::Unexpected(format!(
                "Image host rejected the upload ({}): {}",
                status, body
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(parsed.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_to_sign_keeps_the_provider_field_order() {
        assert_eq!(
            CloudinaryAdapter::string_to_sign(1_700_000_000),
            "folder=bug-screenshots&timestamp=1700000000"
        );
    }

    #[test]
    fn signature_matches_the_provider_scheme() {
        let signature = CloudinaryAdapter::sign(
            "folder=bug-screenshots&timestamp=1700000000",
            "topsecret",
        );
        assert_eq!(signature, "9100cf63452eaa6778c2e9dc312c406f821e6555");
    }
}
