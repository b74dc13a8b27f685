use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::{error::ConfigError, joint::JointSchema};

/// Everything a recording needs, with the defaults of the reference capture script.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Seconds between samples.
    pub interval: f64,
    /// Total recording time in seconds.
    pub duration: f64,
    /// Seconds counted down on stdout before recording starts.
    pub countdown: u32,
    /// Destination CSV file.
    pub output: PathBuf,
    pub joint_columns: JointColumns,
    /// Overrides the default include set of the joint schema when present.
    pub joints: Option<Vec<String>>,
    pub camera: CameraConfig,
    pub body_tracking: BodyTrackingConfig,
    pub positional_tracking: PositionalTrackingConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval: 0.1,
            duration: 60.0,
            countdown: 3,
            output: PathBuf::from("dataset.csv"),
            joint_columns: JointColumns::default(),
            joints: None,
            camera: CameraConfig::default(),
            body_tracking: BodyTrackingConfig::default(),
            positional_tracking: PositionalTrackingConfig::default(),
        }
    }
}

impl CaptureConfig {
    /// Reads a JSON config; missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: CaptureConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = seconds("interval", self.interval)?;
        let duration = seconds("duration", self.duration)?;
        let ticks = duration.as_nanos().div_ceil(interval.as_nanos());
        if ticks > u128::from(u32::MAX) {
            return Err(ConfigError::InvalidValue {
                field: "interval",
                reason: format!("{ticks} ticks over a {}s duration", self.duration),
            });
        }
        let threshold = self.body_tracking.detection_confidence_threshold;
        if !(1..=100).contains(&threshold) {
            return Err(ConfigError::InvalidValue {
                field: "detection_confidence_threshold",
                reason: format!("{threshold} is outside 1..=100"),
            });
        }
        self.schema()?;
        Ok(())
    }

    pub fn interval(&self) -> Result<Duration, ConfigError> {
        seconds("interval", self.interval)
    }

    pub fn duration(&self) -> Result<Duration, ConfigError> {
        seconds("duration", self.duration)
    }

    pub fn schema(&self) -> Result<JointSchema, ConfigError> {
        match &self.joints {
            Some(names) => JointSchema::with_included(names),
            None => Ok(JointSchema::body_34()),
        }
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    if value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} must be positive"),
        });
    }
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        Ok(_) => Err(ConfigError::InvalidValue {
            field,
            reason: format!("{value} is below one nanosecond"),
        }),
        Err(e) => Err(ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }),
    }
}

/// How joint positions are laid out in the CSV.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JointColumns {
    /// One column per joint holding `[x y z]`.
    #[default]
    Packed,
    /// Three columns per joint, `<name>.x`, `<name>.y` and `<name>.z`.
    Split,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub resolution: Resolution,
    pub depth_mode: DepthMode,
    pub coordinate_units: Unit,
    pub sdk_verbose: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Hd720,
            depth_mode: DepthMode::Performance,
            coordinate_units: Unit::Meter,
            sdk_verbose: 1,
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Resolution {
    Hd2k,
    Hd1080,
    Hd720,
    Vga,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DepthMode {
    Performance,
    Quality,
    Ultra,
    Neural,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Foot,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionModel {
    HumanBodyFast,
    HumanBodyMedium,
    HumanBodyAccurate,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTrackingConfig {
    pub detection_model: DetectionModel,
    /// Keep identities across frames. Turns on positional tracking as well.
    pub enable_tracking: bool,
    pub enable_segmentation: bool,
    /// Fit the body model to the keypoints. Computationally heavier.
    pub enable_body_fitting: bool,
    /// Minimum detection confidence, 1 to 100.
    pub detection_confidence_threshold: u8,
}

impl Default for BodyTrackingConfig {
    fn default() -> Self {
        Self {
            detection_model: DetectionModel::HumanBodyFast,
            enable_tracking: true,
            enable_segmentation: false,
            enable_body_fitting: true,
            detection_confidence_threshold: 40,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionalTrackingConfig {
    pub set_floor_as_origin: bool,
}

impl Default for PositionalTrackingConfig {
    fn default() -> Self {
        Self {
            set_floor_as_origin: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    pub fn test_defaults_match_reference_script() {
        let config = CaptureConfig::default();
        assert_eq!(config.interval().unwrap(), Duration::from_millis(100));
        assert_eq!(config.duration().unwrap(), Duration::from_secs(60));
        assert_eq!(config.body_tracking.detection_confidence_threshold, 40);
        assert_eq!(config.camera.resolution, Resolution::Hd720);
        assert_eq!(config.camera.depth_mode, DepthMode::Performance);
        assert_eq!(config.camera.coordinate_units, Unit::Meter);
        assert!(config.positional_tracking.set_floor_as_origin);
        assert_eq!(config.output, PathBuf::from("dataset.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    pub fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "interval": 0.05,
            "camera": { "resolution": "HD1080" },
            "body_tracking": { "detection_model": "HUMAN_BODY_ACCURATE" },
            "joint_columns": "split"
        }"#;
        let config: CaptureConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.interval, 0.05);
        assert_eq!(config.duration, 60.0);
        assert_eq!(config.camera.resolution, Resolution::Hd1080);
        assert_eq!(config.camera.depth_mode, DepthMode::Performance);
        assert_eq!(
            config.body_tracking.detection_model,
            DetectionModel::HumanBodyAccurate
        );
        assert!(config.body_tracking.enable_body_fitting);
        assert_eq!(config.joint_columns, JointColumns::Split);
    }

    #[test]
    pub fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "duration": 5, "joints": ["Neck", "Head"] }}"#).unwrap();

        let config = CaptureConfig::load(file.path()).unwrap();
        assert_eq!(config.duration().unwrap(), Duration::from_secs(5));
        let schema = config.schema().unwrap();
        let names: Vec<&str> = schema.included().map(|joint| joint.name).collect();
        assert_eq!(names, vec!["Neck", "Head"]);
    }

    #[test]
    pub fn test_validate_rejects_bad_values() {
        let mut config = CaptureConfig::default();
        config.interval = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "interval", .. })
        ));

        let mut config = CaptureConfig::default();
        config.duration = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "duration", .. })
        ));

        let mut config = CaptureConfig::default();
        config.body_tracking.detection_confidence_threshold = 0;
        assert!(config.validate().is_err());

        let mut config = CaptureConfig::default();
        config.joints = Some(vec!["Wing".to_string()]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownJoint(_))
        ));
    }

    #[test]
    pub fn test_validate_rejects_more_ticks_than_a_u32() {
        let mut config = CaptureConfig::default();
        config.interval = 1e-9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "interval", .. })
        ));

        config.interval = 1e-6;
        assert!(config.validate().is_ok());
    }

    #[test]
    pub fn test_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            CaptureConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
