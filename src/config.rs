use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::classify::PolicyTables;
use crate::errors::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Deserialize)]
pub struct UserConfig {
    /// Overpass JSON response to decode. A `.xz` extension means xz-compressed.
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub decoder: PolicyTables,
}

pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    let file = File::open(path).map_err(|err| format!("Could not open config file {}: {err}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("Could not parse config {}: {err}", path.display()))?;
    Ok(config)
}
