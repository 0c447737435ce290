pub mod path;


use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    constants::{DEFAULT_AXIS_CENTER, DEFAULT_AXIS_MAX, DEFAULT_AXIS_MIN},
    input::capability::{Axis, Buttons},
};

/// Represents all possible errors loading a [DeviceConfig]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unable to deserialize YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(PathBuf),
}

/// On-disk layout of a device config before its entries are validated
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
#[serde(rename_all = "snake_case")]
struct DeviceConfigDocument {
    #[serde(default)]
    buttons: Map<String, Value>,
    #[serde(default)]
    axes: Map<String, Value>,
}

/// Raw range and logical target of a single device axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisConfig {
    pub axis: Axis,
    pub min: i32,
    pub max: i32,
    pub center: i32,
}

/// Describes how the raw button and axis codes of one device map onto
/// logical controller fields.
///
/// Example config:
///
/// ```json
/// {
///   "buttons": { "304": "A", "305": "B" },
///   "axes": {
///     "0": { "axis": "stick_x", "min": 0, "max": 255, "center": 10 },
///     "2": { "axis": "ltrig", "min": 0, "max": 255 }
///   }
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeviceConfig {
    buttons: HashMap<u16, Buttons>,
    axes: HashMap<u16, AxisConfig>,
}

impl DeviceConfig {
    /// Load a [DeviceConfig] from the given JSON string
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Load a [DeviceConfig] from the given YAML string
    pub fn from_yaml(content: &str) -> Result<Self, LoadError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        // YAML allows integer keys, which become strings here
        let value = serde_json::to_value(value)?;
        Self::from_value(value)
    }

    /// Load a [DeviceConfig] from the given file. The format is chosen by
    /// file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Build a [DeviceConfig] from a parsed document. Invalid button or axis
    /// entries are logged and skipped.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let document: DeviceConfigDocument = serde_json::from_value(value)?;
        let mut config = Self::default();

        for (code, value) in document.buttons.iter() {
            match parse_button(code, value) {
                Ok((code, button)) => {
                    config.buttons.insert(code, button);
                }
                Err(reason) => log::warn!("Skipping button entry '{code}': {reason}"),
            }
        }

        for (code, value) in document.axes.iter() {
            match parse_axis(code, value) {
                Ok((code, axis)) => {
                    config.axes.insert(code, axis);
                }
                Err(reason) => log::warn!("Skipping axis entry '{code}': {reason}"),
            }
        }

        Ok(config)
    }

    /// Mapping of raw button codes to logical buttons
    pub fn buttons(&self) -> &HashMap<u16, Buttons> {
        &self.buttons
    }

    /// Mapping of raw axis codes to logical axes with their raw range
    pub fn axes(&self) -> &HashMap<u16, AxisConfig> {
        &self.axes
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.axes.is_empty()
    }
}

fn parse_code(code: &str) -> Result<u16, String> {
    code.trim()
        .parse::<u16>()
        .map_err(|e| format!("invalid event code: {e}"))
}

fn parse_button(code: &str, value: &Value) -> Result<(u16, Buttons), String> {
    let code = parse_code(code)?;
    let Some(name) = value.as_str() else {
        return Err(format!("expected a button name, got {value}"));
    };
    let Some(button) = Buttons::from_name(name) else {
        return Err(format!("unknown button '{name}'"));
    };
    Ok((code, button))
}

fn parse_axis(code: &str, value: &Value) -> Result<(u16, AxisConfig), String> {
    let code = parse_code(code)?;
    let Some(name) = value.get("axis").and_then(|v| v.as_str()) else {
        return Err("missing axis name".to_string());
    };
    let axis: Axis = name.parse()?;

    let min = get_i32(value, "min", DEFAULT_AXIS_MIN)?;
    let max = get_i32(value, "max", DEFAULT_AXIS_MAX)?;
    let center = get_i32(value, "center", DEFAULT_AXIS_CENTER)?;

    Ok((
        code,
        AxisConfig {
            axis,
            min,
            max,
            center,
        },
    ))
}

/// Returns the integer field with the given key, or the default if the field
/// is not present.
fn get_i32(value: &Value, key: &str, default: i32) -> Result<i32, String> {
    let Some(field) = value.get(key) else {
        return Ok(default);
    };
    field
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| format!("'{key}' must be an integer, got {field}"))
}
