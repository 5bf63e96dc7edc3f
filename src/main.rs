//! `evcharge` - command-line front end for the EV-charging admin API.
//!
//! # Usage
//!
//! ```bash
//! # Dashboard aggregate for the current week
//! evcharge --email admin@example.com --password secret dashboard --period week
//!
//! # Paginated user list
//! evcharge users --page 2 --limit 50
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use evcharge_client::api::endpoints::{GetDashboardData, GetDashboardStats, GetUser, GetUsers};
use evcharge_client::api::{DashboardArgs, DashboardPeriod, Endpoint, UsersArgs};
use evcharge_client::config::{Config, ConfigStore};
use evcharge_client::logging::init_tracing;
use evcharge_client::EvChargingApi;

#[derive(Parser, Debug)]
#[command(name = "evcharge")]
#[command(about = "EV-charging admin API client")]
#[command(version)]
struct Args {
    /// Config file (default: ~/.config/evcharge/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Log in with this email before running the command
    #[arg(long, env = "EVCHARGE_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "EVCHARGE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Debug logging to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Period-scoped dashboard aggregate
    Dashboard {
        #[arg(short, long, value_enum)]
        period: Option<PeriodArg>,
    },

    /// Headline dashboard counters
    Stats,

    /// List users
    Users {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one user
    User { id: String },

    /// Print the client state tree after login
    State,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PeriodArg {
    Day,
    Week,
    Month,
}

impl From<PeriodArg> for DashboardPeriod {
    fn from(period: PeriodArg) -> Self {
        match period {
            PeriodArg::Day => DashboardPeriod::Day,
            PeriodArg::Week => DashboardPeriod::Week,
            PeriodArg::Month => DashboardPeriod::Month,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let path = args.config.clone().unwrap_or_else(Config::config_path);
    let config = ConfigStore::open(path).context("Failed to load configuration")?;
    if let Some(base_url) = &args.base_url {
        config.update(|c| c.api.base_url = base_url.clone());
    }
    let config = config.get();
    config.validate().context("Invalid configuration")?;

    let api = EvChargingApi::connect(&config)?;

    match (&args.email, &args.password) {
        (Some(email), Some(password)) => {
            api.login(email, password)
                .await
                .context("Login failed")?;
        }
        (Some(_), None) | (None, Some(_)) => bail!("--email and --password must be given together"),
        (None, None) => {}
    }

    match args.command {
        Command::Dashboard { period } => {
            let args = DashboardArgs {
                period: period.map(DashboardPeriod::from),
            };
            run_query::<GetDashboardData>(&api, args).await
        }
        Command::Stats => run_query::<GetDashboardStats>(&api, ()).await,
        Command::Users {
            page,
            limit,
            search,
        } => run_query::<GetUsers>(&api, UsersArgs { page, limit, search }).await,
        Command::User { id } => run_query::<GetUser>(&api, id).await,
        Command::State => print_json(&*api.state()),
    }
}

async fn run_query<E: Endpoint>(api: &EvChargingApi, args: E::Args) -> Result<()> {
    let handle = api.query::<E>(args)?;
    let result = handle.resolved().await;

    if let Some(error) = result.error {
        bail!("{} failed ({}): {}", E::NAME, error.kind(), error);
    }
    match result.data {
        Some(data) => print_json(&data),
        None => bail!("{} returned no data", E::NAME),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
