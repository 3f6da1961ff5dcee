use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# Monitoring report configuration

[report]
# City printed in the report's place-and-date line
city = "Florianópolis"
# Offset from UTC used for generation dates and object keys
utc_offset_hours = -3

[labels]
# Shown where a value or limit cannot be read as a number
unavailable = "Indisponível"
achieved = "Alcançado"
not_achieved = "Não Alcançado"
toxic = "Tóxico"
surface = "Superfície"
middle = "Meio"
bottom = "Fundo"

[storage]
# Generated documents land in <root>/<bucket>/<asset>/<date>/
root = "reports"
public_base_url = "file://reports"

[registry]
path = "reports/registry.jsonl"

[data]
# Holds assets/, configurations/ and campaigns/
root = "data"
"#;

pub fn init_config(force: bool) -> Result<()> {
    write_default_config(&PathBuf::from(CONFIG_FILE_NAME), force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}

pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }
    io::write_file(path, DEFAULT_CONFIG)
}
