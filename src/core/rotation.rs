use crate::config::store::ConfigStore;
use crate::core::model::{
    FailureStage, ManagedSource, RotationOutcome, RunSummary, SessionToken,
};
use crate::core::ports::{CatalogApi, DatabaseAdmin, SecretSource};
use crate::utils::error::Result;

const SOURCE_CONTAINER_TYPE: &str = "SOURCE";

/// Drives one full rotation run: authenticate, enumerate the catalog, and
/// hand each managed source through the three-way credential handoff.
pub struct RotationEngine<C, D, G>
where
    C: CatalogApi,
    D: DatabaseAdmin,
    G: SecretSource,
{
    catalog: C,
    database: D,
    secrets: G,
    managed_type: String,
}

impl<C, D, G> RotationEngine<C, D, G>
where
    C: CatalogApi,
    D: DatabaseAdmin,
    G: SecretSource,
{
    pub fn new(catalog: C, database: D, secrets: G, managed_type: impl Into<String>) -> Self {
        Self {
            catalog,
            database,
            secrets,
            managed_type: managed_type.into(),
        }
    }

    /// 跑完整個輪替流程。只有目錄認證失敗會讓整個 run 中止；
    /// 個別來源的錯誤一律轉成 RotationOutcome 繼續往下。
    ///
    /// 呼叫端負責在 run 結束後把 store 寫回磁碟（整份、一次）。
    pub async fn run(&self, store: &mut ConfigStore) -> Result<RunSummary> {
        let token = self
            .catalog
            .authenticate(
                &store.main.catalog_admin_user,
                &store.main.catalog_admin_user_password,
            )
            .await?;
        tracing::info!("Authenticated with catalog server");

        let entries = self.catalog.list_entries(&token).await?;
        let mut summary = RunSummary::default();

        for entry in entries
            .iter()
            .filter(|entry| entry.container_type == SOURCE_CONTAINER_TYPE)
        {
            let source = match self.catalog.describe_source(&token, &entry.id).await {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("Failed to describe catalog entry {}: {}", entry.id, e);
                    summary.record(
                        entry.id.clone(),
                        RotationOutcome::Failed {
                            stage: FailureStage::CatalogQuery,
                            cause: e.to_string(),
                        },
                    );
                    continue;
                }
            };

            if source.source_type != self.managed_type {
                tracing::debug!(
                    "Ignoring source {} of type {}",
                    source.name,
                    source.source_type
                );
                continue;
            }

            tracing::info!("Processing source {} with id {}", source.name, source.id);
            let outcome = self.rotate_source(&token, &source, store).await;
            summary.record(source.name.clone(), outcome);
        }

        Ok(summary)
    }

    /// 單一來源的五個步驟，順序固定：先查設定，再連外部資料庫，
    /// 產生新密碼並改掉外部密碼，最後更新目錄。
    /// 只有目錄更新成功後才改記憶體中的設定。
    async fn rotate_source(
        &self,
        token: &SessionToken,
        source: &ManagedSource,
        store: &mut ConfigStore,
    ) -> RotationOutcome {
        let current_password = match store.current_password(&source.name) {
            Some(password) => password.to_string(),
            None => {
                tracing::warn!(
                    "No stored password for source {}, leaving it untouched",
                    source.name
                );
                return RotationOutcome::Skipped {
                    reason: "missing config entry".to_string(),
                };
            }
        };

        let mut session = match self.database.connect(source, &current_password).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(
                    "Could not connect to {} as {}: {}",
                    source.hostname,
                    source.username,
                    e
                );
                return RotationOutcome::Failed {
                    stage: FailureStage::Connect,
                    cause: e.to_string(),
                };
            }
        };

        let new_password = self.secrets.generate();

        let changed = self
            .database
            .change_password(&mut session, &source.username, &new_password)
            .await;
        self.database.close(session).await;

        if let Err(e) = changed {
            tracing::warn!(
                "Password change failed for user {} on {}: {}",
                source.username,
                source.hostname,
                e
            );
            return RotationOutcome::Failed {
                stage: FailureStage::ExternalChange,
                cause: e.to_string(),
            };
        }
        tracing::info!(
            "Database password changed for user {} on {}",
            source.username,
            source.hostname
        );

        if let Err(e) = self
            .catalog
            .update_source_password(token, &source.id, &new_password)
            .await
        {
            // 資料庫那邊已經換了新密碼，但目錄跟設定檔還拿著舊的。
            // 在人工修復前這個來源經由目錄是連不上的。
            tracing::error!(
                "INCONSISTENT: catalog update failed for source {} after its database \
                 password was already changed; the catalog and the stored config still \
                 hold the previous credential and the source is unreachable until \
                 repaired manually: {}",
                source.name,
                e
            );
            return RotationOutcome::Failed {
                stage: FailureStage::CatalogUpdate,
                cause: e.to_string(),
            };
        }
        tracing::info!("Catalog definition updated for source {}", source.name);

        store.set_password(&source.name, &new_password);
        RotationOutcome::Succeeded { new_password }
    }
}
