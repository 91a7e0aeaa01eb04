//! Command dispatch: bridges CLI args -> catalog operations -> output.

pub mod config_cmd;
pub mod export;
pub mod products;
pub mod util;

use stockroom_core::{Catalog, ProductClient};

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a catalog-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    catalog: &Catalog,
    client: &ProductClient,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => products::list(catalog, client, &args, global).await,
        Command::Get { id } => products::get(client, &id, global).await,
        Command::Create(fields) => products::create(catalog, client, fields, global).await,
        Command::Update(args) => products::update(catalog, client, args, global).await,
        Command::Delete { ids } => products::delete(catalog, client, ids, global).await,
        Command::Duplicate { id } => products::duplicate(catalog, client, &id, global).await,
        Command::Export(args) => export::handle(catalog, client, args, cfg, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not need the catalog".into(),
        )),
    }
}
