use std::{error::Error, path::PathBuf};

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::config::{path::find_device_config, DeviceConfig};
use crate::input::source::{evdev::EvdevEnumerator, SourceEnumerator, SourceInfo};

#[derive(Tabled)]
struct DeviceRow {
    path: String,
    name: String,
    config: String,
}

/// Print a table of present input devices. With `configured` set, devices
/// without a device config are left out.
pub fn handle_devices(config_paths: &[PathBuf], configured: bool) -> Result<(), Box<dyn Error>> {
    let sources: Vec<SourceInfo> = EvdevEnumerator
        .enumerate()
        .iter()
        .map(|source| SourceInfo::from(source.as_ref()))
        .collect();

    let mut rows = Vec::with_capacity(sources.len());
    for source in sources {
        let config = describe_config(config_paths, &source.name);
        if configured && config.is_none() {
            continue;
        }
        rows.push(DeviceRow {
            path: source.path.display().to_string(),
            name: source.name,
            config: config.unwrap_or_else(|| "-".to_string()),
        });
    }
    let count = rows.len();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Input Devices"));
    println!("{table}");
    println!("Found {count} device(s)");

    Ok(())
}

/// Returns the config path for the given device name, marking configs that
/// fail to load.
fn describe_config(config_paths: &[PathBuf], name: &str) -> Option<String> {
    let path = find_device_config(config_paths, name)?;
    let description = match DeviceConfig::from_path(&path) {
        Ok(_) => path.display().to_string(),
        Err(e) => format!("{} (invalid: {e})", path.display()),
    };
    Some(description)
}
