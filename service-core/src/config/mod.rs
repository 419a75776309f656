use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Name of the per-service configuration directory.
const CONFIG_DIR: &str = "config";

/// Resolve a service's root directory.
///
/// Binaries are started either from the workspace root or from inside the
/// service directory, so both layouts are accepted.
pub fn service_root(service_name: &str) -> Result<PathBuf, AppError> {
    let base_path = std::env::current_dir()?;

    if base_path.ends_with(service_name) {
        Ok(base_path)
    } else {
        Ok(base_path.join(service_name))
    }
}

/// Load layered settings for a service.
///
/// Sources, lowest precedence first:
/// 1. `<service>/config/base.yaml`
/// 2. `<service>/config/<ENVIRONMENT>.yaml` (optional)
/// 3. `APP_`-prefixed environment variables, `__` separating nested keys
///    (e.g. `APP_SMTP__HOST`).
pub fn load<T: DeserializeOwned>(service_root: &Path) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let configuration_directory = service_root.join(CONFIG_DIR);
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());

    let config = Cfg::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            File::from(configuration_directory.join(format!("{}.yaml", environment)))
                .required(false),
        )
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}
