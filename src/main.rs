use std::env;
use std::fs::create_dir_all;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use overpass_decode::config::{load_user_config, UserConfig, DEFAULT_CONFIG_PATH};
use overpass_decode::errors::Result;
use overpass_decode::etl::decode_overpass::DecodeOverpassEtl;
use overpass_decode::etl::Etl;

fn create_output_dir(config: &UserConfig) -> Result<PathBuf> {
    let input_fname = config
        .data_path
        .file_name()
        .ok_or("Could not get input file name")?;
    let output_dir = config.output_dir.join(input_fname);
    create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn setup_logging() {
    Builder::with_level("info")
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    setup_logging();

    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let user_config = load_user_config(Path::new(&config_path))?;
    let output_dir = create_output_dir(&user_config)?;

    let mut etl = DecodeOverpassEtl::new(&user_config);
    etl.process(&output_dir)?;

    let archive = DecodeOverpassEtl::output_path(&output_dir).display().to_string();
    info!(output = archive.as_str(); "Registry ready");
    Ok(())
}
