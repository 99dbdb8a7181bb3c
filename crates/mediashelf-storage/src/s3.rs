use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;
use mediashelf_core::config::{Credentials, StoreSettings};

/// S3 storage implementation
///
/// One client per configuration; credentials are never written to process-wide state.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region; `None` falls back to the SDK's default provider chain
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO, "https://nyc3.digitaloceanspaces.com" for DigitalOcean Spaces)
    /// * `credentials` - Static credentials; `None` uses ambient/instance credentials
    pub async fn new(
        bucket: String,
        region: Option<String>,
        endpoint_url: Option<String>,
        credentials: Option<Credentials>,
    ) -> StorageResult<Self> {
        let region_provider =
            RegionProviderChain::first_try(region.map(aws_config::Region::new))
                .or_default_provider();

        let retry_config = RetryConfig::standard()
            .with_max_attempts(5)
            .with_retry_mode(RetryMode::Adaptive);

        let mut config_builder = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config);

        if let Some(credentials) = credentials {
            config_builder =
                config_builder.credentials_provider(aws_sdk_s3::config::Credentials::new(
                    credentials.access_key_id,
                    credentials.secret_access_key,
                    None,
                    None,
                    "mediashelf",
                ));
        }

        let config = config_builder.load().await;

        let region = config
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| {
                StorageError::ConfigError(
                    "No region configured for S3 (set MEDIASHELF_S3_REGION or AWS_REGION)"
                        .to_string(),
                )
            })?;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&config);
        if let Some(ref endpoint) = endpoint_url {
            // Path-style addressing is required for MinIO and most S3-compatible providers
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }
        let client = Client::from_conf(s3_config_builder.build());

        Ok(S3Storage {
            client,
            bucket,
            region,
            endpoint_url,
        })
    }

    /// Build from validated store settings.
    pub async fn from_settings(settings: &StoreSettings) -> StorageResult<Self> {
        let bucket = settings.bucket.clone().ok_or_else(|| {
            StorageError::ConfigError("MEDIASHELF_S3_BUCKET not configured".to_string())
        })?;
        Self::new(
            bucket,
            settings.region.clone(),
            settings.endpoint.clone(),
            settings.credentials.clone(),
        )
        .await
    }

    /// Generate public URL for S3 object
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style: {endpoint}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        public: bool,
    ) -> StorageResult<String> {
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .set_acl(public.then_some(ObjectCannedAcl::PublicRead))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            public = public,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.generate_url(key))
    }

    async fn remove_object(&self, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();

        let result = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        if let Err(e) = result {
            if e.code() == Some("NoSuchKey") {
                return Err(StorageError::NotFound(key.to_string()));
            }
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            return Err(StorageError::DeleteFailed(e.to_string()));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
