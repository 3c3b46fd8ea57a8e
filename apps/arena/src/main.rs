use herald_arena::{ArenaConfig, DEFAULT_CONFIG_PATH};
use herald_kernel::config::load_optional_config;
use herald_logger::Logger;

fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1);
    let config: ArenaConfig =
        load_optional_config(Some(path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)))?;

    let _logger = Logger::from_settings(env!("CARGO_PKG_NAME"), &config.log)?;

    herald_arena::run(&config);

    Ok(())
}
