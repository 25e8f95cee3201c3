use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use xz::bufread::XzDecoder;

use crate::classify::PolicyTables;
use crate::config::UserConfig;
use crate::decode::Decoder;
use crate::errors::{Error, Result};
use crate::task::{DecodeOutcome, DecodeTask};

use super::Etl;

pub const ETL_NAME: &str = "decode_overpass";
pub const OUTPUT_FILE_NAME: &str = "registry.rkyv";

/// Decodes an Overpass response file and archives the resolved registry.
pub struct DecodeOverpassEtl {
    data_path: PathBuf,
    decoder: Arc<Decoder<PolicyTables>>,
}

impl DecodeOverpassEtl {
    pub fn new(config: &UserConfig) -> DecodeOverpassEtl {
        DecodeOverpassEtl {
            data_path: config.data_path.clone(),
            decoder: Arc::new(Decoder::new(config.decoder.clone())),
        }
    }

    pub fn output_path(dir: &Path) -> PathBuf {
        dir.join(OUTPUT_FILE_NAME)
    }

    fn is_compressed(&self) -> bool {
        self.data_path.extension().is_some_and(|ext| ext == "xz")
    }

    fn read_input(&self) -> Result<Vec<u8>> {
        let mut file_reader = BufReader::new(File::open(&self.data_path)?);
        let mut bytes = Vec::new();
        if self.is_compressed() {
            XzDecoder::new(file_reader).read_to_end(&mut bytes)?;
        } else {
            file_reader.read_to_end(&mut bytes)?;
        }
        Ok(bytes)
    }
}

impl Etl for DecodeOverpassEtl {
    type Input = Vec<u8>;
    type Output = DecodeOutcome;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(Self::output_path(dir).try_exists()?)
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        if self.is_cached(dir)? {
            fs::remove_file(Self::output_path(dir))?;
        }
        Ok(())
    }

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        let bytes = self.read_input()?;
        info!(etl_name = ETL_NAME, bytes = bytes.len(); "Read Overpass response");
        Ok(bytes)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let task = DecodeTask::new(self.decoder.clone(), input);
        let handle = task.handle();
        task.run();
        handle
            .into_result()
            .unwrap_or_else(|| Err(Error::from("Decode did not finish")))
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let bytes = rkyv::to_bytes::<_, 256>(&output.registry)
            .map_err(|err| Error::from(format!("Could not archive registry: {err:?}")))?;
        let mut output_file = File::create(Self::output_path(dir))?;
        output_file.write_all(&bytes)?;
        info!(
            etl_name = ETL_NAME,
            elements = output.registry.len(),
            failed = output.stats.failed;
            "Wrote registry archive"
        );
        Ok(())
    }
}
