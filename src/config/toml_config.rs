use crate::adapters::line_import::{DEFAULT_DELIMITER, DEFAULT_LINE_TAG};
use crate::core::ranking::DEFAULT_LOOKBACK_DAYS;
use crate::core::ConfigProvider;
use crate::utils::error::{OrderError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 所有區段都可省略，省略時用預設值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub ranking: RankingConfig,
    pub import: ImportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub lookback_days: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub delimiter: String,
    pub line_tag: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: char::from(DEFAULT_DELIMITER).to_string(),
            line_tag: DEFAULT_LINE_TAG.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "compact".to_string(),
            level: "info".to_string(),
        }
    }
}

const LOG_FORMATS: [&str; 2] = ["compact", "json"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_LOOKBACK_DAYS: u32 = 3650;

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${ORDER_LINE_TAG})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| OrderError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format == "json"
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range(
            "ranking.lookback_days",
            self.ranking.lookback_days,
            0,
            MAX_LOOKBACK_DAYS,
        )?;
        validation::validate_delimiter("import.delimiter", &self.import.delimiter)?;
        validation::validate_non_empty_string("import.line_tag", &self.import.line_tag)?;
        validation::validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;
        validation::validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn lookback_days(&self) -> u32 {
        self.ranking.lookback_days
    }

    fn import_delimiter(&self) -> u8 {
        validation::validate_delimiter("import.delimiter", &self.import.delimiter)
            .unwrap_or(DEFAULT_DELIMITER)
    }

    fn line_tag(&self) -> &str {
        &self.import.line_tag
    }
}
