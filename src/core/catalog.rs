use crate::core::model::{CatalogEntry, ManagedSource, SessionToken};
use crate::core::ports::CatalogApi;
use crate::utils::error::{Result, RotateError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_DB_PORT: u16 = 5432;

pub struct CatalogClient {
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "userName")]
    user_name: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct CatalogListing {
    data: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct SourceDetail {
    id: String,
    name: String,
    #[serde(rename = "type")]
    source_type: String,
    config: SourceDetailConfig,
}

#[derive(Deserialize)]
struct SourceDetailConfig {
    hostname: String,
    port: Option<u16>,
    instance: Option<String>,
    username: String,
    #[serde(rename = "useSsl", default)]
    use_ssl: bool,
}

/// Partial patch accepted by the per-id update endpoint. The id inside the
/// body has to match the id in the path.
#[derive(Serialize)]
struct PasswordPatch<'a> {
    id: &'a str,
    config: PasswordPatchConfig<'a>,
}

#[derive(Serialize)]
struct PasswordPatchConfig<'a> {
    password: &'a str,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn authenticate(&self, username: &str, password: &str) -> Result<SessionToken> {
        let login_url = self.url("/apiv2/login");

        tracing::debug!("Authenticating against {}", login_url);
        let response = self
            .client
            .post(&login_url)
            .json(&LoginRequest {
                user_name: username,
                password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RotateError::AuthError {
                message: format!("{} returned status {}", login_url, response.status()),
            });
        }

        let body: LoginResponse = response.json().await?;
        Ok(SessionToken::new(body.token))
    }

    async fn list_entries(&self, token: &SessionToken) -> Result<Vec<CatalogEntry>> {
        let response = self
            .client
            .get(self.url("/api/v3/catalog"))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RotateError::CatalogError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let listing: CatalogListing = response.json().await?;
        tracing::debug!("Catalog listing returned {} entries", listing.data.len());
        Ok(listing.data)
    }

    async fn describe_source(&self, token: &SessionToken, id: &str) -> Result<ManagedSource> {
        let response = self
            .client
            .get(self.url(&format!("/api/v3/catalog/{}", id)))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RotateError::CatalogError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let detail: SourceDetail = response.json().await?;
        Ok(ManagedSource {
            id: detail.id,
            name: detail.name,
            source_type: detail.source_type,
            hostname: detail.config.hostname,
            port: detail.config.port.unwrap_or(DEFAULT_DB_PORT),
            instance: detail.config.instance,
            username: detail.config.username,
            use_encryption: detail.config.use_ssl,
        })
    }

    async fn update_source_password(
        &self,
        token: &SessionToken,
        id: &str,
        new_password: &str,
    ) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("/api/v3/catalog/{}", id)))
            .bearer_auth(token.as_str())
            .json(&PasswordPatch {
                id,
                config: PasswordPatchConfig {
                    password: new_password,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RotateError::CatalogError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}
