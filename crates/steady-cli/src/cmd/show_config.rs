use clap::Args;
use std::fs;
use steady_core::config::Config;
use steady_core::error::SaResult;
use steady_core::storage::{PersistedState, StorageWrite};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub config: Config,

    /// Also write the user switches as a storage snapshot
    #[arg(long)]
    pub state_out: Option<String>,
}

pub fn run(args: ConfigArgs, config: Config) -> SaResult<()> {
    println!("{}", serde_json::to_string_pretty(&config)?);

    if let Some(path) = args.state_out {
        let mut state = PersistedState::default();
        let write = StorageWrite::Config(config.assist.clone());
        write.apply_to(&mut state);
        fs::write(&path, serde_json::to_string_pretty(&state)?)?;
        info!("Wrote {} keys to {}", write.keys().len(), path);
    }
    Ok(())
}
