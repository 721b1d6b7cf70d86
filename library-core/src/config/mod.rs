//! Layered settings loading shared by every binary in the workspace.
//!
//! Sources, later ones overriding earlier ones:
//! 1. `<crate>/config/base.yaml` (optional)
//! 2. `APP_`-prefixed environment variables, `__` separating sections
//!    (`APP_CATALOG__BASE_URL` sets `catalog.base_url`)

use crate::error::CoreError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use validator::Validate;

pub const BASE_CONFIG_FILE: &str = "base.yaml";

/// Resolve the configuration directory for `crate_dir`.
///
/// Works both when running from the workspace root and from inside the crate.
pub fn configuration_directory(crate_dir: &str) -> Result<PathBuf, CoreError> {
    let base_path = std::env::current_dir()?;

    if base_path.ends_with(crate_dir) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(crate_dir).join("config"))
    }
}

/// Load and validate settings for the crate living in `crate_dir`.
pub fn load<T>(crate_dir: &str) -> Result<T, CoreError>
where
    T: DeserializeOwned + Validate,
{
    dotenvy::dotenv().ok();
    load_from(&configuration_directory(crate_dir)?)
}

/// Load and validate settings from an explicit configuration directory.
pub fn load_from<T>(configuration_directory: &Path) -> Result<T, CoreError>
where
    T: DeserializeOwned + Validate,
{
    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join(BASE_CONFIG_FILE)).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings: T = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
