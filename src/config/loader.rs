//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! policy from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollConfigFile, PayrollPolicy};

/// Name of the policy file inside a configuration directory.
pub const POLICY_FILE: &str = "payroll.yaml";

/// Loads and provides access to the payroll policy.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── payroll.yaml   # threshold, overtime multiplier, re-run policy
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Overtime after {} hours", loader.policy().regular_threshold_hours);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    policy: PayrollPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `payroll.yaml` is missing, is not valid YAML, or
    /// holds a non-positive threshold or a multiplier below 1.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let policy_path = path.as_ref().join(POLICY_FILE);
        let path_str = policy_path.display().to_string();

        let content = fs::read_to_string(&policy_path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses a policy document; `origin` names the source in errors.
    pub fn from_yaml_str(content: &str, origin: &str) -> EngineResult<Self> {
        let file: PayrollConfigFile =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        if let Some(message) = file.payroll.problem() {
            return Err(EngineError::ConfigParseError {
                path: origin.to_string(),
                message,
            });
        }

        Ok(Self {
            policy: file.payroll,
        })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    /// Consumes the loader, returning the policy.
    pub fn into_policy(self) -> PayrollPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RerunPolicy;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let policy = result.unwrap().into_policy();
        assert_eq!(policy.regular_threshold_hours, dec("160"));
        assert_eq!(policy.overtime_multiplier, dec("1.5"));
        assert_eq!(policy.rerun_policy, RerunPolicy::Reject);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("payroll.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let loader = ConfigLoader::from_yaml_str(
            "payroll:\n  rerun_policy: replace\n",
            "inline",
        )
        .unwrap();

        assert_eq!(loader.policy().regular_threshold_hours, dec("160"));
        assert_eq!(loader.policy().rerun_policy, RerunPolicy::Replace);
    }

    #[test]
    fn test_custom_threshold_and_multiplier() {
        let loader = ConfigLoader::from_yaml_str(
            "payroll:\n  regular_threshold_hours: \"152\"\n  overtime_multiplier: \"2\"\n",
            "inline",
        )
        .unwrap();

        assert_eq!(loader.policy().regular_threshold_hours, dec("152"));
        assert_eq!(loader.policy().overtime_multiplier, dec("2"));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        match ConfigLoader::from_yaml_str("payroll: [unclosed", "inline") {
            Err(EngineError::ConfigParseError { path, .. }) => assert_eq!(path, "inline"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_rerun_policy_is_parse_error() {
        let result = ConfigLoader::from_yaml_str("payroll:\n  rerun_policy: merge\n", "inline");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_multiplier_below_one_rejected() {
        let result = ConfigLoader::from_yaml_str(
            "payroll:\n  overtime_multiplier: \"0.5\"\n",
            "inline",
        );
        match result {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("overtime_multiplier"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let result = ConfigLoader::from_yaml_str(
            "payroll:\n  regular_threshold_hours: \"0\"\n",
            "inline",
        );
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
