use crate::core::model::{CatalogEntry, ManagedSource, SessionToken};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<SessionToken>;

    async fn list_entries(&self, token: &SessionToken) -> Result<Vec<CatalogEntry>>;

    async fn describe_source(&self, token: &SessionToken, id: &str) -> Result<ManagedSource>;

    /// `id` must be the id returned by `describe_source` for this same
    /// source, never a constant or another iteration's id.
    async fn update_source_password(
        &self,
        token: &SessionToken,
        id: &str,
        new_password: &str,
    ) -> Result<()>;
}

#[async_trait]
pub trait DatabaseAdmin: Send + Sync {
    type Session: Send;

    async fn connect(
        &self,
        source: &ManagedSource,
        current_password: &str,
    ) -> Result<Self::Session>;

    async fn change_password(
        &self,
        session: &mut Self::Session,
        username: &str,
        new_password: &str,
    ) -> Result<()>;

    async fn close(&self, session: Self::Session);
}

pub trait SecretSource: Send + Sync {
    fn generate(&self) -> String;
}
