//! TUI launch command handler.

use lullaby::LullabyResult;
use std::path::Path;

/// Launch the dashboard over the story database at `db_path`.
#[cfg(feature = "tui")]
pub async fn launch_tui(db_path: &Path) -> LullabyResult<()> {
    use lullaby::{DatabaseBackend, run_tui};

    tracing::info!(path = %db_path.display(), "Launching TUI");

    let mut backend = DatabaseBackend::open(db_path)?;
    run_tui(&mut backend)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
pub async fn launch_tui(_db_path: &Path) -> LullabyResult<()> {
    eprintln!("Error: TUI feature not enabled. Rebuild with --features tui");
    std::process::exit(1);
}
