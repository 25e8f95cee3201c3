pub mod decode_overpass;

use std::path::Path;
use log::{info, error};

use crate::errors::Result;

fn logged<T>(etl_name: &str, step: &str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        error!(etl_name = etl_name, step = step, err = err.message.as_str(); "ETL step failed with error");
    }
    result
}

/// A cached processing step: read input, turn it into output, write the output
/// into a directory. Skipped when the output is already there.
pub trait Etl {
    type Input;
    type Output;

    fn etl_name(&self) -> &str;

    fn is_cached(&self, dir: &Path) -> Result<bool>;
    fn clean(&self, dir: &Path) -> Result<()>;

    fn extract(&mut self, dir: &Path) -> Result<Self::Input>;
    fn transform(&mut self, input: Self::Input) -> Result<Self::Output>;
    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()>;

    fn process(&mut self, dir: &Path) -> Result<()> {
        let etl_name = self.etl_name().to_string();
        info!(etl_name = etl_name.as_str(); "Starting ETL process");
        if self.is_cached(dir)? {
            info!(etl_name = etl_name.as_str(); "Using cached value");
        } else {
            info!(etl_name = etl_name.as_str(); "Extracting");
            let extracted = self.extract(dir);
            let input = logged(&etl_name, "extract", extracted)?;

            info!(etl_name = etl_name.as_str(); "Transforming");
            let transformed = self.transform(input);
            let output = logged(&etl_name, "transform", transformed)?;

            info!(etl_name = etl_name.as_str(); "Loading");
            let loaded = self.load(dir, output);
            logged(&etl_name, "load", loaded)?;
        }
        info!(etl_name = etl_name.as_str(); "Process finished");
        Ok(())
    }
}
