use crate::app::runner::JobPaths;
use crate::core::transform::{TransformChain, TransformSpec};
use crate::core::DatasetFormat;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_distinct_paths, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML 描述的一次資料集轉換
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job: JobSection,
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub transform: Vec<TransformSpec>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub format: Option<DatasetFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl JobConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref)
            .map_err(|e| EtlError::from_io(&path_ref.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NOVEL_DATA_DIR})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn job_paths(&self) -> JobPaths {
        JobPaths::new(self.input.path.clone(), self.output.path.clone(), self.input.format)
    }

    pub fn build_transform(&self) -> TransformChain {
        TransformChain::from_specs(&self.transform)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input.path", &self.input.path)?;
        validate_path("output.path", &self.output.path)?;
        validate_distinct_paths(&self.input.path, &self.output.path)?;

        if self.transform.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "transform".to_string(),
            });
        }
        for spec in &self.transform {
            spec.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VIEWS_JOB: &str = r#"
[job]
name = "fix-views"
description = "Divide inflated view counts"

[input]
path = "novels.jsonl"

[output]
path = "novels_fixed.jsonl"

[[transform]]
type = "correct_outlier"
field = "views"
threshold = 10000000
divisor = 10

[monitoring]
enabled = true
"#;

    #[test]
    fn test_parse_job_config() {
        let config = JobConfig::from_toml_str(VIEWS_JOB).unwrap();

        assert_eq!(config.job.name, "fix-views");
        assert_eq!(config.job_paths().format, DatasetFormat::Lines);
        assert_eq!(config.transform.len(), 1);
        assert_eq!(config.build_transform().len(), 1);
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_format() {
        let config = JobConfig::from_toml_str(
            r#"
[job]
name = "annotate"

[input]
path = "novels.data"
format = "array"

[output]
path = "novels_source.data"

[[transform]]
type = "annotate"
value = "Novelpia"
"#,
        )
        .unwrap();

        assert_eq!(config.job_paths().format, DatasetFormat::Array);
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NOVELPEDIA_TEST_INPUT", "from_env.json");

        let config = JobConfig::from_toml_str(
            r#"
[job]
name = "env"

[input]
path = "${NOVELPEDIA_TEST_INPUT}"

[output]
path = "${NOVELPEDIA_TEST_UNSET_VAR}"
"#,
        )
        .unwrap();

        assert_eq!(config.input.path, "from_env.json");
        assert_eq!(config.output.path, "${NOVELPEDIA_TEST_UNSET_VAR}");

        std::env::remove_var("NOVELPEDIA_TEST_INPUT");
    }

    #[test]
    fn test_job_without_transforms_is_invalid() {
        let config = JobConfig::from_toml_str(
            r#"
[job]
name = "empty"

[input]
path = "a.json"

[output]
path = "b.json"
"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unknown_transform_type_fails_to_parse() {
        let result = JobConfig::from_toml_str(
            r#"
[job]
name = "bad"

[input]
path = "a.json"

[output]
path = "b.json"

[[transform]]
type = "deduplicate"
"#,
        );
        assert!(matches!(result, Err(EtlError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(VIEWS_JOB.as_bytes()).unwrap();

        let config = JobConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "fix-views");
    }

    #[test]
    fn test_missing_config_file() {
        let err = JobConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, EtlError::FileNotFound { .. }));
    }
}
