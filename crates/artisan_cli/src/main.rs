//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `artisan_core` linkage (ping/version).
//! - Resolve one user id against the configured database and print the
//!   client as JSON (`null` when no client is linked). The database must
//!   already exist; a missing file is reported, not created.
//!
//! Usage: `artisan_cli [user_id]`. Configuration comes from `ARTISAN_*`
//! environment variables (see `artisan_core::config`).

use artisan_core::db::open_existing_db;
use artisan_core::{init_logging, ClientResolver, ShopConfig, SqliteClientStore, UserId};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("artisan_core ping={}", artisan_core::ping());
    println!("artisan_core version={}", artisan_core::core_version());

    let Some(raw_user_id) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match resolve(raw_user_id) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve(raw_user_id: String) -> Result<String, Box<dyn Error>> {
    let config = ShopConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }
    info!(
        "event=cli_resolve module=cli status=start db_path={}",
        config.db_path.display()
    );

    let conn = open_existing_db(&config.db_path)?;
    let resolver = ClientResolver::new(SqliteClientStore::try_new(&conn)?);
    let user_id = UserId::from_db_text(raw_user_id);
    let client = resolver.get_client_from_user(Some(&user_id))?;

    Ok(serde_json::to_string_pretty(&client)?)
}
