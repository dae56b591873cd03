//! Lullaby CLI binary.
//!
//! This binary provides command-line access to Lullaby's functionality:
//! - Generate judge-refined bedtime stories
//! - Browse, search, export, and delete saved stories
//! - Launch the terminal dashboard over the story history

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, database_path, handle_stories_command, launch_tui, load_config,
        run_generate,
    };

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    lullaby::init_telemetry(cli.verbose)?;

    match cli.command {
        Commands::Generate(args) => {
            if let Err(e) = run_generate(args, cli.config.as_deref(), cli.database.as_deref()).await
            {
                println!("\n❌ Error generating story: {e}");
                println!("Please check your API key and try again.");
                return Err(e.into());
            }
        }

        Commands::Stories(cmd) => {
            let config = load_config(cli.config.as_deref())?;
            let path = database_path(&config, cli.database.as_deref());
            handle_stories_command(cmd, &path).await?;
        }

        Commands::Tui => {
            let config = load_config(cli.config.as_deref())?;
            let path = database_path(&config, cli.database.as_deref());
            launch_tui(&path).await?;
        }
    }

    Ok(())
}
