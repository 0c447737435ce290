//! Module for searching for per-device config files

use std::path::{Path, PathBuf};

use crate::constants::CONFIG_PREFIX;

/// Base system fallback path to use if one cannot be found with XDG
const FALLBACK_BASE_PATH: &str = "/usr/share/evpad";

/// System-wide directory for administrator provided device configs
const SYSTEM_DEVICES_PATH: &str = "/etc/evpad/devices.d";

/// File extensions of device configs in the order they are preferred
const CONFIG_EXTENSIONS: [&str; 2] = ["json", "yaml"];

/// Returns the base path for device configs shipped with evpad. Packaged
/// configs are read-only data rather than user settings, so they live in the
/// first existing XDG data dir (e.g. /usr/share/evpad) and are searched last.
pub fn get_base_path() -> PathBuf {
    let Ok(base_dirs) = xdg::BaseDirectories::with_prefix(CONFIG_PREFIX) else {
        log::warn!("Unable to determine config base path. Using fallback path.");
        return PathBuf::from(FALLBACK_BASE_PATH);
    };

    // Get the data directories in preference order
    let data_dirs = base_dirs.get_data_dirs();
    for dir in data_dirs {
        if dir.exists() {
            return dir;
        }
    }

    log::debug!("Config base path not found. Using fallback path.");
    PathBuf::from(FALLBACK_BASE_PATH)
}

/// Returns the user's config directory (e.g. "~/.config/evpad")
pub fn get_user_path() -> Option<PathBuf> {
    match xdg::BaseDirectories::with_prefix(CONFIG_PREFIX) {
        Ok(base_dirs) => Some(base_dirs.get_config_home()),
        Err(e) => {
            log::warn!("Unable to determine user config path: {e}");
            None
        }
    }
}

/// Returns a list of directories in load order to find device configurations.
/// E.g. ["~/.config/evpad/devices", "/etc/evpad/devices.d", "/usr/share/evpad/devices"]
pub fn get_devices_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(user_path) = get_user_path() {
        paths.push(user_path.join("devices"));
    }
    paths.push(PathBuf::from(SYSTEM_DEVICES_PATH));
    paths.push(get_base_path().join("devices"));

    paths
}

/// Returns the file name stem used to look up the config of a device with
/// the given name. Surrounding whitespace is removed and path separators are
/// replaced so a device name can never point outside of a config directory.
pub fn sanitize_device_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Look through the given directories in order for a config file matching the
/// given device name. Returns the path of the first one found.
pub fn find_device_config<P: AsRef<Path>>(paths: &[P], name: &str) -> Option<PathBuf> {
    let stem = sanitize_device_name(name);
    if stem.is_empty() {
        return None;
    }

    for dir in paths {
        for ext in CONFIG_EXTENSIONS {
            let path = dir.as_ref().join(format!("{stem}.{ext}"));
            log::trace!("Checking for device config: {path:?}");
            if path.is_file() {
                return Some(path);
            }
        }
    }

    None
}
