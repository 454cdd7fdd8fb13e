use crate::conf::{ConfigError, load_config};
use anyhow::bail;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            println!("✔ Config loaded successfully");
            println!("✔ log: {} ({:?})", cfg.server.log_path.display(), cfg.server.log_format);
            println!("✔ probe: {}:{}", cfg.server.address, cfg.server.port);
            println!("✔ state: {}", cfg.state_path().display());
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            bail!("configuration check failed");
        }
    }
}

fn print_config_error(err: &ConfigError, plain: bool) {
    match err {
        ConfigError::Invalid { path, report } if !plain => report.render_pretty(path),
        ConfigError::Invalid { report, .. } => {
            eprintln!("{err}");
            for issue in &report.errors {
                eprintln!("  error: {}: {}", issue.field, issue.message);
            }
        }
        _ => eprintln!("{err}"),
    }

    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "Create a starter config with:\n\
             \n\
             sbpanel config init",
        ),

        ConfigError::Parse { .. } => Some(
            "The only required setting is the server log path.\n\
             \n\
             Example:\n\
             \n\
             server {\n\
             \x20 log_path = \"/srv/starbound/storage/starbound_server.log\"\n\
             }",
        ),

        ConfigError::Invalid { .. } => None,
    }
}
