// src/settings/io.rs
use std::fs;
use std::io::{self, BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use bevy::log::{debug, error, info, warn};
use directories_next::ProjectDirs;

use super::{AppSettings, DATA_DIR_ENV};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "SecureIT";
const APPLICATION: &str = "SecureITWorkbench";
const CONFIG_FILE: &str = "app_settings.json";
pub const STORE_FILE: &str = "workspace.sqlite3";

fn project_dirs() -> io::Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        io::Error::new(
            ErrorKind::NotFound,
            "Could not determine project directories for app settings.",
        )
    })
}

fn get_config_path() -> io::Result<PathBuf> {
    let dirs = project_dirs()?;
    let config_dir = dirs.config_dir();
    fs::create_dir_all(config_dir)?;
    Ok(config_dir.join(CONFIG_FILE))
}

pub fn load_settings_from_file() -> io::Result<AppSettings> {
    load_settings_from(&get_config_path()?)
}

pub fn save_settings_to_file(settings: &AppSettings) -> io::Result<()> {
    save_settings_to(&get_config_path()?, settings)
}

/// Missing file means defaults; an unreadable one is an error.
pub fn load_settings_from(config_file: &Path) -> io::Result<AppSettings> {
    info!("AppSettings: Attempting to load settings from {:?}", config_file);
    match fs::File::open(config_file) {
        Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
            Ok(settings) => {
                info!("AppSettings: Successfully deserialized settings.");
                Ok(settings)
            }
            Err(e) => {
                error!("AppSettings: Failed to parse settings file {:?}: {}", config_file, e);
                Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Failed to parse settings file: {}", e),
                ))
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("AppSettings: Settings file not found at {:?}. Returning default.", config_file);
            Ok(AppSettings::default())
        }
        Err(e) => {
            error!("AppSettings: Failed to open settings file {:?}: {}", config_file, e);
            Err(e)
        }
    }
}

pub fn save_settings_to(config_file: &Path, settings: &AppSettings) -> io::Result<()> {
    info!("AppSettings: Saving settings to {:?}", config_file);
    let writer = BufWriter::new(fs::File::create(config_file)?);
    serde_json::to_writer_pretty(writer, settings).map_err(|e| {
        error!("AppSettings: Failed to serialize settings to {:?}: {}", config_file, e);
        io::Error::new(ErrorKind::Other, e)
    })
}

/// Loads settings, logging and falling back to defaults on any error.
pub fn load_or_default() -> AppSettings {
    load_settings_from_file().unwrap_or_else(|e| {
        warn!("AppSettings: Using defaults: {}", e);
        AppSettings::default()
    })
}

/// Data directory by precedence: explicit override, `SECUREIT_DATA_DIR`,
/// the settings file, then the platform data dir.
pub fn resolve_data_dir(settings: &AppSettings, cli_override: Option<&Path>) -> PathBuf {
    if let Some(dir) = cli_override {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        debug!("AppSettings: Data dir from {}", DATA_DIR_ENV);
        return PathBuf::from(dir);
    }
    if let Some(dir) = &settings.data_dir {
        return dir.clone();
    }
    match project_dirs() {
        Ok(dirs) => dirs.data_dir().to_path_buf(),
        Err(e) => {
            warn!("AppSettings: {}. Using ./secureit-data", e);
            PathBuf::from("secureit-data")
        }
    }
}

pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("secureit-settings-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = temp_dir("missing");
        let settings = load_settings_from(&dir.join("nope.json")).unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = temp_dir("roundtrip");
        let path = dir.join(CONFIG_FILE);
        let settings = AppSettings {
            auto_save: false,
            data_dir: Some(dir.clone()),
            ..AppSettings::default()
        };
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), settings);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn garbage_is_invalid_data() {
        let dir = temp_dir("garbage");
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        let err = load_settings_from(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn explicit_override_wins() {
        let settings = AppSettings {
            data_dir: Some(PathBuf::from("/from/settings")),
            ..AppSettings::default()
        };
        assert_eq!(
            resolve_data_dir(&settings, Some(Path::new("/from/cli"))),
            PathBuf::from("/from/cli")
        );
        assert_eq!(store_path(Path::new("/d")), PathBuf::from("/d").join(STORE_FILE));
    }
}
