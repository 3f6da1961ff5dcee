//! Collaborators and output: everything that touches the outside world.

pub mod output;
pub mod real;
pub mod traits;
pub mod writers;

pub use output::{create_writer, JsonWriter, OutputFormat, OutputWriter};
pub use real::{
    DirectoryStorage, FixedClock, FsDataSource, JsonBundleRenderer, JsonLinesRegistry, SystemClock,
};
pub use traits::{
    AssetDirectory, Clock, ConfigurationSource, RegistryRecord, RenderedDocument, ReportRegistry,
    SampleSource, StorageSink, TemplateRenderer,
};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
