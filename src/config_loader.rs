use crate::config::{ConfigError, NetworkConfig};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk configuration format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON; everything else is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Outcome of writing the default configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultFileStatus {
    Created,
    Overwritten,
}

fn io_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Parse configuration text without validating it
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<NetworkConfig, ConfigError> {
    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };
    Ok(config)
}

/// Load, parse and validate a configuration file
pub fn load_config(config_path: &Path) -> Result<NetworkConfig, ConfigError> {
    info!("Loading configuration from: {:?}", config_path);

    let content = fs::read_to_string(config_path).map_err(|e| io_error(config_path, e))?;
    let config = parse_config(&content, ConfigFormat::from_path(config_path))?;

    config.validate()?;

    Ok(config)
}

/// Serialize `config` to `config_path` in the format its extension selects
pub fn save_config(config: &NetworkConfig, config_path: &Path) -> Result<(), ConfigError> {
    let content = match ConfigFormat::from_path(config_path) {
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    };
    fs::write(config_path, content).map_err(|e| io_error(config_path, e))
}

/// Write the default configuration, replacing any existing file
pub fn write_default_config(config_path: &Path) -> Result<DefaultFileStatus, ConfigError> {
    let status = if config_path.exists() {
        warn!("Overwriting existing configuration at {:?} with defaults", config_path);
        DefaultFileStatus::Overwritten
    } else {
        DefaultFileStatus::Created
    };

    save_config(&NetworkConfig::default(), config_path)?;
    info!("Default configuration written to {:?}", config_path);

    Ok(status)
}

/// Load `config_path`, creating it with defaults first if it does not exist
pub fn load_or_create(config_path: &Path) -> Result<NetworkConfig, ConfigError> {
    if !config_path.exists() {
        info!("No configuration at {:?}; creating the default one", config_path);
        write_default_config(config_path)?;
    }
    load_config(config_path)
}

/// Default configuration file name used by `init`
pub fn default_config_path() -> PathBuf {
    PathBuf::from("network_config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Medium;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("net.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("NET.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("net.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("net")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_load_yaml_config() {
        let yaml = r#"
subnets:
  e1: { subnet: 192.168.1.0/28, host_count: 1, switch_address: 192.168.1.14 }
  e2: { subnet: 192.168.1.16/28, host_count: 1, switch_address: 192.168.1.30 }
  e3: { subnet: 192.168.1.32/28, host_count: 1, switch_address: 192.168.1.46 }
  e4: { subnet: 192.168.1.48/28, host_count: 1, switch_address: 192.168.1.62 }
aggregation:
  a1: 192.168.1.65
  a2: 192.168.1.66
core:
  root_address: 192.168.1.254
connections:
  edge_to_host: wireless
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.subnets["e3"].host_count, 1);
        assert_eq!(
            config.connections.unwrap().edge_to_host.unwrap(),
            crate::config::LinkPolicy::Fixed(Medium::Wireless)
        );
    }

    #[test]
    fn test_load_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("network_config.json");
        save_config(&NetworkConfig::default(), &path).unwrap();

        assert!(fs::read_to_string(&path).unwrap().trim_start().starts_with('{'));
        assert_eq!(load_config(&path).unwrap(), NetworkConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let mut config = NetworkConfig::default();
        config.subnets.get_mut("e1").unwrap().host_count = 0;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        save_config(&config, &path).unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::NoHosts { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "subnets: [not, a, map").unwrap();
        assert!(matches!(load_config(temp_file.path()), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_write_default_reports_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("network_config.yaml");

        assert_eq!(write_default_config(&path).unwrap(), DefaultFileStatus::Created);
        assert_eq!(write_default_config(&path).unwrap(), DefaultFileStatus::Overwritten);
        assert_eq!(load_config(&path).unwrap(), NetworkConfig::default());
    }

    #[test]
    fn test_load_or_create() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.yaml");
        assert!(!path.exists());

        let config = load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, NetworkConfig::default());

        // An existing file is loaded as-is
        let mut custom = NetworkConfig::default();
        custom.subnets.get_mut("e4").unwrap().host_count = 5;
        save_config(&custom, &path).unwrap();
        assert_eq!(load_or_create(&path).unwrap().subnets["e4"].host_count, 5);
    }
}
