mod add;
mod init;
mod list;
mod sections;

pub use add::cmd_add;
pub use init::cmd_init;
pub use list::cmd_list;
pub use sections::cmd_sections;

use crate::config::Config;
use crate::services::CatalogService;
use crate::state::SharedState;
use std::sync::Arc;

async fn open_catalog(config: &Config) -> anyhow::Result<Arc<dyn CatalogService>> {
    let state = SharedState::new(config.clone()).await?;
    Ok(state.catalog_service)
}

fn progress_line(done: u32, total: Option<u32>) -> String {
    total.map_or_else(|| format!("{done}/?"), |t| format!("{done}/{t}"))
}
