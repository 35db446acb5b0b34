//! Restaurant POS back-office server
//!
//! # Module structure
//!
//! ```text
//! pos-server/src/
//! ├── core/     # config, state, HTTP server
//! ├── api/      # routes and handlers
//! ├── db/       # SQLite pool, row models, repositories
//! ├── orders/   # order placement and status transitions
//! ├── menu/     # platform gating, bulk availability
//! └── utils/    # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod menu;
pub mod orders;
pub mod utils;

// Re-export public types
pub use self::core::server::app;
pub use self::core::{Config, Server, ServerState};
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResult};

/// Load .env, create the work directory layout and start logging
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = config.log_dir();
    init_logger_with_file(log_level.as_deref(), log_dir.to_str());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
