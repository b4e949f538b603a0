use crate::utils::error::{Result, RotateError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PASSWORD_LENGTH: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MANAGED_SOURCE_TYPE: &str = "POSTGRES";

/// 整份設定檔：一個 [main] 區段加上每個受管來源自己的區段。
///
/// 區段名稱即目錄中的來源名稱，攤平成 map 後每個來源最多一筆記錄。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigStore {
    pub main: MainSection,
    #[serde(flatten)]
    pub sources: BTreeMap<String, SourceSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainSection {
    pub catalog_server_url: String,
    pub catalog_admin_user: String,
    pub catalog_admin_user_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_log_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    pub current_password: String,
}

impl ConfigStore {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RotateError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RotateError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_ADMIN_PASSWORD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 整份設定寫回磁碟；檔案含有憑證，權限收斂為僅擁有者可讀寫
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let rendered = toml::to_string_pretty(self).map_err(|e| RotateError::ConfigError {
            message: format!("TOML serialization error: {}", e),
        })?;
        std::fs::write(&path, rendered)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Stored password for a source, by its catalog name. Empty entries count
    /// as missing.
    pub fn current_password(&self, name: &str) -> Option<&str> {
        self.sources
            .get(name)
            .map(|section| section.current_password.as_str())
            .filter(|password| !password.is_empty())
    }

    /// Overwrite the in-memory record for a source. Only called after the
    /// catalog accepted the new password.
    pub fn set_password(&mut self, name: &str, new_password: &str) {
        if let Some(section) = self.sources.get_mut(name) {
            section.current_password = new_password.to_string();
        }
    }

    pub fn password_length(&self) -> usize {
        self.main.password_length.unwrap_or(DEFAULT_PASSWORD_LENGTH)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.main
                .request_timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }

    pub fn managed_source_type(&self) -> &str {
        self.main
            .managed_source_type
            .as_deref()
            .unwrap_or(DEFAULT_MANAGED_SOURCE_TYPE)
    }

    pub fn audit_log_path(&self) -> Option<&str> {
        self.main.audit_log_path.as_deref()
    }

    /// 驗證設定的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("main.catalog_server_url", &self.main.catalog_server_url)?;
        validation::validate_non_empty_string(
            "main.catalog_admin_user",
            &self.main.catalog_admin_user,
        )?;
        validation::validate_non_empty_string(
            "main.catalog_admin_user_password",
            &self.main.catalog_admin_user_password,
        )?;

        // 不重複取樣，長度不能超過字母表大小
        validation::validate_range("main.password_length", self.password_length(), 1, 94)?;

        Ok(())
    }
}

impl Validate for ConfigStore {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
