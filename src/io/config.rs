//! Read/write configuration JSON files.
//!
//! A configuration file is the plain mapping produced by
//! [`Configuration::as_dict`]. Keys may be omitted; missing options take their
//! defaults when the file is read, and the result is validated.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::config::Configuration;
use crate::error::{PsignifitError, Result};

/// Read and validate a configuration JSON file.
pub fn read_config_json(path: &Path) -> Result<Configuration> {
    Configuration::from_dict(read_config_dict(path)?)
}

/// Read a configuration JSON file as a plain mapping, without validating it.
pub fn read_config_dict(path: &Path) -> Result<Map<String, Value>> {
    let file = File::open(path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    let Value::Object(dict) = value else {
        return Err(PsignifitError::config(format!(
            "Configuration file '{}' must hold a JSON object.",
            path.display()
        )));
    };
    log::debug!("read {} options from {}", dict.len(), path.display());
    Ok(dict)
}

/// Write a configuration as pretty JSON, every option included.
pub fn write_config_json(path: &Path, config: &Configuration) -> Result<()> {
    let dict = config.as_dict()?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &dict)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
