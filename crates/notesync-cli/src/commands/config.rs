use std::io::Write;
use std::path::Path;

use notesync_core::util::non_blank;
use notesync_core::ClientConfig;

use crate::cli::ConfigCommands;
use crate::commands::common::resolve_config_path;
use crate::error::CliError;

pub fn run_config<W: Write>(
    command: ConfigCommands,
    config_path: Option<&Path>,
    out: &mut W,
) -> Result<(), CliError> {
    let path = resolve_config_path(config_path)?;
    match command {
        ConfigCommands::Show => run_config_show(&path, out),
        ConfigCommands::Init {
            api_url,
            app_id,
            collection,
            poll_interval_ms,
        } => run_config_init(
            &path,
            ConfigInit {
                api_url,
                app_id,
                collection,
                poll_interval_ms,
            },
            out,
        ),
    }
}

pub fn run_config_show<W: Write>(path: &Path, out: &mut W) -> Result<(), CliError> {
    let config = ClientConfig::resolve(Some(path))?;

    writeln!(out, "# {}", path.display())?;
    writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
    if config.access_token.is_some() {
        writeln!(out, "# access token: set")?;
    }
    Ok(())
}

/// Values passed to `config init`; unset fields keep the current file value
#[derive(Debug, Default)]
pub struct ConfigInit {
    pub api_url: Option<String>,
    pub app_id: Option<String>,
    pub collection: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

pub fn run_config_init<W: Write>(
    path: &Path,
    init: ConfigInit,
    out: &mut W,
) -> Result<(), CliError> {
    let mut config = ClientConfig::load_from_path(path)?;

    if let Some(api_url) = non_blank(init.api_url) {
        config.api_url = api_url;
    }
    if let Some(app_id) = non_blank(init.app_id) {
        config.app_id = app_id;
    }
    if let Some(collection) = non_blank(init.collection) {
        config.collection = collection;
    }
    if let Some(poll_interval_ms) = init.poll_interval_ms {
        config.poll_interval_ms = poll_interval_ms;
    }

    config.save_to_path(path)?;
    tracing::info!("Saved config for collection {}", config.collection);
    writeln!(out, "Config written to {}", path.display())?;
    Ok(())
}
