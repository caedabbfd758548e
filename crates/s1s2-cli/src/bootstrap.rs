use anyhow::Context;
use s1s2_config::S1s2Config;

use crate::cli::Commands;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(command: &Commands) -> anyhow::Result<S1s2Config> {
    let mut config = S1s2Config::load_with_dotenv().context("failed to load configuration")?;
    apply_overrides(&mut config, command);
    config
        .validate()
        .context("invalid configuration after command-line overrides")?;
    Ok(config)
}

fn apply_overrides(config: &mut S1s2Config, command: &Commands) {
    match command {
        Commands::Serve(args) => {
            if let Some(host) = &args.host {
                config.server.host.clone_from(host);
            }
            if let Some(port) = args.port {
                config.server.port = port;
            }
            config.server.debug |= args.debug;
        }
        Commands::Render(args) => {
            config.ingest.strict_labels |= args.strict_labels;
        }
    }
}
