//! Station configuration file.
//!
//! One TOML file carries everything the pillbox station is provisioned
//! with. Only `[band]` changes how the band link behaves; the Wi-Fi,
//! Telegram, and pin sections are validated and displayed so a single
//! file can be checked before it is flashed alongside the firmware.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use guardian_core::LinkConfig;
use guardian_types::BAND_NAME;
use serde::{Deserialize, Serialize};

/// Highest GPIO number on the ESP32.
const MAX_GPIO: u8 = 39;

/// ESP32 GPIOs 34-39 have no output driver.
const INPUT_ONLY_GPIO: std::ops::RangeInclusive<u8> = 34..=39;

/// Placeholder shown instead of secrets.
const MASK: &str = "********";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wi-Fi credentials.
    pub wifi: WifiConfig,
    /// Telegram notification target.
    pub telegram: TelegramConfig,
    /// GPIO assignments.
    pub pins: PinConfig,
    /// Band link settings.
    pub band: BandConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// GPIO assignments for the pillbox board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Compartment IR sensors.
    pub ir1: u8,
    pub ir2: u8,
    pub ir3: u8,
    /// Buttons.
    pub btn_set: u8,
    pub btn_up: u8,
    pub btn_down: u8,
    pub buzzer: u8,
    /// Status LED strip, if fitted.
    ///
    /// A `[pins]` table without this key means no strip. Only a config with
    /// no `[pins]` table at all gets the default GPIO 15.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neopixel: Option<u8>,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            ir1: 25,
            ir2: 16,
            ir3: 36,
            btn_set: 33,
            btn_up: 32,
            btn_down: 39,
            buzzer: 23,
            neopixel: Some(15),
        }
    }
}

impl PinConfig {
    fn assignments(&self) -> Vec<(&'static str, u8)> {
        let mut pins = vec![
            ("ir1", self.ir1),
            ("ir2", self.ir2),
            ("ir3", self.ir3),
            ("btn_set", self.btn_set),
            ("btn_up", self.btn_up),
            ("btn_down", self.btn_down),
            ("buzzer", self.buzzer),
        ];
        if let Some(pin) = self.neopixel {
            pins.push(("neopixel", pin));
        }
        pins
    }

    /// Validate pin assignments.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen: HashMap<u8, &str> = HashMap::new();

        for (name, pin) in self.assignments() {
            let field = format!("pins.{}", name);
            if pin > MAX_GPIO {
                errors.push(ValidationError {
                    field,
                    message: format!("GPIO {} does not exist (maximum {})", pin, MAX_GPIO),
                });
                continue;
            }
            if let Some(other) = seen.insert(pin, name) {
                errors.push(ValidationError {
                    field,
                    message: format!("GPIO {} is already used by pins.{}", pin, other),
                });
            }
        }

        let outputs = [("buzzer", Some(self.buzzer)), ("neopixel", self.neopixel)];
        for (name, pin) in outputs {
            if let Some(pin) = pin
                && INPUT_ONLY_GPIO.contains(&pin)
            {
                errors.push(ValidationError {
                    field: format!("pins.{}", name),
                    message: format!("GPIO {} is input-only and cannot drive an output", pin),
                });
            }
        }

        errors
    }
}

/// Band link settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Advertised name to match, in addition to the band service UUID.
    pub name: String,
    /// How long discovery listens for the band.
    pub scan_timeout_ms: u64,
    /// Bound for connect and write.
    pub operation_timeout_ms: u64,
    /// How long a discovered address skips rescanning.
    pub cache_ttl_secs: u64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            name: BAND_NAME.to_string(),
            scan_timeout_ms: 4000,
            operation_timeout_ms: 1500,
            cache_ttl_secs: 60,
        }
    }
}

impl BandConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    /// Link settings for these values.
    pub fn link_config(&self) -> LinkConfig {
        LinkConfig::default()
            .scan_timeout(self.scan_timeout())
            .operation_timeout(Duration::from_millis(self.operation_timeout_ms))
            .cache_ttl(Duration::from_secs(self.cache_ttl_secs))
            .band_name(Some(&self.name))
    }

    /// Validate band settings.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError {
                field: "band.name".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.scan_timeout_ms == 0 {
            errors.push(ValidationError {
                field: "band.scan_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.operation_timeout_ms == 0 {
            errors.push(ValidationError {
                field: "band.operation_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        errors
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - The band name is not empty
    /// - Scan and operation timeouts are non-zero
    /// - Pins exist on the ESP32, are not shared, and outputs are not
    ///   on input-only GPIOs
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.band.validate());
        errors.extend(self.pins.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Copy with the Wi-Fi password and bot token hidden.
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if !masked.wifi.password.is_empty() {
            masked.wifi.password = MASK.to_string();
        }
        if !masked.telegram.bot_token.is_empty() {
            masked.telegram.bot_token = MASK.to_string();
        }
        masked
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `band.name` or `pins.buzzer`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("guardianrx")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: ConfigError) -> Vec<String> {
        match err {
            ConfigError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.band.name, "GuardianRX-Band");
        assert_eq!(config.band.scan_timeout_ms, 4000);
        assert_eq!(config.band.operation_timeout_ms, 1500);
        assert_eq!(config.band.cache_ttl_secs, 60);
        assert_eq!(config.pins.buzzer, 23);
        assert_eq!(config.pins.neopixel, Some(15));
        assert!(config.wifi.ssid.is_empty());
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_link_config_from_band_section() {
        let band = BandConfig {
            name: "Ward-3 Band".to_string(),
            scan_timeout_ms: 8000,
            operation_timeout_ms: 2500,
            cache_ttl_secs: 30,
        };
        let link = band.link_config();
        assert_eq!(link.scan_timeout, Duration::from_secs(8));
        assert_eq!(link.operation_timeout, Duration::from_millis(2500));
        assert_eq!(link.cache_ttl, Duration::from_secs(30));
        assert_eq!(link.band_name.as_deref(), Some("Ward-3 Band"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [band]
            scan_timeout_ms = 6000
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.band.scan_timeout_ms, 6000);
        assert_eq!(config.band.operation_timeout_ms, 1500);
        assert_eq!(config.band.name, "GuardianRX-Band");
        assert_eq!(config.pins, PinConfig::default());
    }

    #[test]
    fn test_config_full_toml() {
        let toml = r#"
            [wifi]
            ssid = "ward-3"
            password = "hunter2"

            [telegram]
            bot_token = "123:abc"
            chat_id = "-100200300"

            [pins]
            ir1 = 25
            ir2 = 26
            ir3 = 27
            btn_set = 33
            btn_up = 32
            btn_down = 35
            buzzer = 23

            [band]
            name = "Ward-3 Band"
            scan_timeout_ms = 5000
            operation_timeout_ms = 2000
            cache_ttl_secs = 120
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.wifi.ssid, "ward-3");
        assert_eq!(config.telegram.chat_id, "-100200300");
        assert_eq!(config.pins.btn_down, 35);
        // Left out of [pins], so no strip is fitted
        assert_eq!(config.pins.neopixel, None);
        assert_eq!(config.band.cache_ttl_secs, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.wifi.ssid = "ward-3".to_string();
        config.band.name = "Ward-3 Band".to_string();

        config.save(&config_path).unwrap();
        let loaded = Config::load(&config_path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.pins.neopixel, Some(15));
    }

    #[test]
    fn test_save_and_load_without_neopixel() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.pins.neopixel = None;

        config.save(&config_path).unwrap();
        let loaded = Config::load(&config_path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_unfitted_neopixel_frees_its_pin() {
        let toml = r#"
            [pins]
            ir1 = 25
            ir2 = 15
            ir3 = 36
            btn_set = 33
            btn_up = 32
            btn_down = 39
            buzzer = 23
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.pins.neopixel, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "this is not valid { toml").unwrap();

        let result = Config::load(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_validated_rejects_bad_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[band]\nname = \"\"\n").unwrap();

        let result = Config::load_validated(&config_path);
        assert_eq!(fields(result.unwrap_err()), vec!["band.name"]);
    }

    #[test]
    fn test_band_validation() {
        let mut config = Config::default();
        config.band.name = "  ".to_string();
        config.band.scan_timeout_ms = 0;
        config.band.operation_timeout_ms = 0;
        config.band.cache_ttl_secs = 0;

        assert_eq!(
            fields(config.validate().unwrap_err()),
            vec![
                "band.name",
                "band.scan_timeout_ms",
                "band.operation_timeout_ms"
            ]
        );
    }

    #[test]
    fn test_pin_out_of_range() {
        let mut config = Config::default();
        config.pins.ir2 = 40;
        assert_eq!(fields(config.validate().unwrap_err()), vec!["pins.ir2"]);
    }

    #[test]
    fn test_duplicate_pins() {
        let mut config = Config::default();
        config.pins.btn_up = config.pins.btn_set;
        let errors = fields(config.validate().unwrap_err());
        assert_eq!(errors, vec!["pins.btn_up"]);
    }

    #[test]
    fn test_output_on_input_only_pin() {
        let mut config = Config::default();
        config.pins.buzzer = 34;
        assert_eq!(fields(config.validate().unwrap_err()), vec!["pins.buzzer"]);

        let mut config = Config::default();
        config.pins.neopixel = Some(36);
        let errors = fields(config.validate().unwrap_err());
        // Also collides with ir3
        assert!(errors.contains(&"pins.neopixel".to_string()));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_masked_hides_secrets() {
        let mut config = Config::default();
        config.wifi.ssid = "ward-3".to_string();
        config.wifi.password = "hunter2".to_string();
        config.telegram.bot_token = "123:abc".to_string();
        config.telegram.chat_id = "42".to_string();

        let masked = config.masked();
        assert_eq!(masked.wifi.ssid, "ward-3");
        assert_eq!(masked.wifi.password, "********");
        assert_eq!(masked.telegram.bot_token, "********");
        assert_eq!(masked.telegram.chat_id, "42");

        let shown = toml::to_string_pretty(&masked).unwrap();
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("123:abc"));
    }

    #[test]
    fn test_masked_leaves_empty_secrets() {
        let masked = Config::default().masked();
        assert!(masked.wifi.password.is_empty());
        assert!(masked.telegram.bot_token.is_empty());
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("guardianrx/config.toml"));
    }

    #[test]
    fn test_validation_error_display() {
        let error = ConfigError::Validation(vec![
            ValidationError {
                field: "band.name".to_string(),
                message: "cannot be empty".to_string(),
            },
            ValidationError {
                field: "pins.buzzer".to_string(),
                message: "GPIO 34 is input-only".to_string(),
            },
        ]);
        let display = error.to_string();
        assert!(display.contains("  - band.name: cannot be empty"));
        assert!(display.contains("pins.buzzer"));
    }
}
