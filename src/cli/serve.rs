use crate::models::InitiativedConfig;
use crate::server::{start_server, AppState};
use crate::store::JsonStore;
use crate::Result;
use std::path::Path;

pub async fn run(config_path: &Path, port: Option<u16>) -> Result<()> {
    let config = InitiativedConfig::load(config_path)?;
    let store = JsonStore::load(&config.data_file)?;
    let port = port.unwrap_or(config.server.port);

    let state = AppState::new(store, config);
    start_server(port, state).await
}
