use crate::conf::error::ConfigError;
use crate::conf::types::PanelConfig;
use std::fs;
use std::path::Path;

/// Read, parse and validate an HCL config file.
pub fn load_config(path: &Path) -> Result<PanelConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = parse_config(path, &raw)?;

    let report = config.validate();
    if !report.is_ok() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            report,
        });
    }

    for warning in &report.warnings {
        tracing::warn!(field = warning.field, "{}", warning.message);
    }

    Ok(config)
}

/// Parse without validating. `path` is only used for error context.
pub fn parse_config(path: &Path, raw: &str) -> Result<PanelConfig, ConfigError> {
    hcl::from_str(raw).map_err(|e| ConfigError::parse(path, e))
}
