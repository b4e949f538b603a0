use crate::core::model::ManagedSource;
use crate::core::ports::DatabaseAdmin;
use crate::utils::error::{Result, RotateError};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};
use std::time::Duration;

/// ALTER USER cannot carry bind placeholders, so the statement is assembled
/// server side: both values travel as parameters and come back quoted by
/// format()'s %I/%L before being executed on the same session.
const QUOTE_ALTER_USER: &str =
    "SELECT format('ALTER USER %I WITH PASSWORD %L', $1::text, $2::text)";

pub struct PostgresAdmin {
    timeout: Duration,
}

impl PostgresAdmin {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl DatabaseAdmin for PostgresAdmin {
    type Session = PgConnection;

    async fn connect(
        &self,
        source: &ManagedSource,
        current_password: &str,
    ) -> Result<PgConnection> {
        let mut options = PgConnectOptions::new()
            .host(&source.hostname)
            .port(source.port)
            .username(&source.username)
            .password(current_password)
            .ssl_mode(if source.use_encryption {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            });

        if let Some(instance) = &source.instance {
            options = options.database(instance);
        }

        tracing::debug!(
            "Connecting to {}:{} as {}",
            source.hostname,
            source.port,
            source.username
        );

        match tokio::time::timeout(self.timeout, PgConnection::connect_with(&options)).await {
            Ok(connected) => Ok(connected?),
            Err(_) => Err(RotateError::TimeoutError {
                operation: format!("connect to {}:{}", source.hostname, source.port),
            }),
        }
    }

    async fn change_password(
        &self,
        session: &mut PgConnection,
        username: &str,
        new_password: &str,
    ) -> Result<()> {
        let change = async {
            let statement: String = sqlx::query_scalar(QUOTE_ALTER_USER)
                .bind(username)
                .bind(new_password)
                .fetch_one(&mut *session)
                .await?;

            sqlx::query(&statement).execute(&mut *session).await?;
            Ok(())
        };

        match tokio::time::timeout(self.timeout, change).await {
            Ok(result) => result,
            Err(_) => Err(RotateError::TimeoutError {
                operation: format!("change password for {}", username),
            }),
        }
    }

    async fn close(&self, session: PgConnection) {
        if let Err(e) = session.close().await {
            tracing::debug!("Error closing database session: {}", e);
        }
    }
}
