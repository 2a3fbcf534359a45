use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use lettly_accounts::config::AccountsConfig;
use lettly_accounts::state::AppState;
use lettly_accounts::usecase::account::{
    BootstrapSuperAdminInput, BootstrapSuperAdminUseCase, GetAccountUseCase,
};
use lettly_core::config::Config;
use lettly_core::tracing::init_tracing;
use lettly_domain::id::{ExternalId, IdentityId};

/// Operator tooling for privileged dashboard accounts.
#[derive(Debug, Parser)]
#[command(name = "accounts", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ensure the given identity owns an active super admin account.
    Bootstrap {
        #[arg(long, env = "BOOTSTRAP_IDENTITY_ID")]
        identity_id: IdentityId,
        #[arg(long, env = "BOOTSTRAP_CREDENTIAL", hide_env_values = true)]
        credential: String,
    },
    /// Print an account as JSON.
    Show {
        #[arg(long)]
        external_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = AccountsConfig::try_from_env().context("failed to load config")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    let state = AppState {
        db,
        settings: config.settings().context("invalid accounts config")?,
    };

    match args.command {
        Command::Bootstrap {
            identity_id,
            credential,
        } => {
            let usecase = BootstrapSuperAdminUseCase {
                identities: state.identity_port(),
                accounts: state.account_repo(),
                settings: state.settings.clone(),
            };
            let account = usecase
                .execute(BootstrapSuperAdminInput {
                    identity_id,
                    credential,
                })
                .await?;
            info!(external_id = %account.external_id(), "bootstrap complete");
        }
        Command::Show { external_id } => {
            let usecase = GetAccountUseCase {
                accounts: state.account_repo(),
            };
            let account = usecase
                .by_external_id(&ExternalId::new(external_id))
                .await?;
            println!("{}", serde_json::to_string_pretty(&account)?);
        }
    }
    Ok(())
}
