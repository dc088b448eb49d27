use clap::{Parser, Subcommand};
use finsight_core::capture::{self, ProfileForm};
use finsight_core::client::{FinsightApi, HttpFinsightClient};
use finsight_core::controller::{Completion, Controller};
use finsight_core::domain::profile::{Horizon, RiskLevel};
use finsight_core::trace::TraceViewer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod session;
mod view;

#[derive(Debug, Parser)]
#[command(name = "finsight", about = "Stock picks and single-stock research from a FinSight backend")]
struct Args {
    /// Backend origin, e.g. http://localhost:8000. Overrides FINSIGHT_API_BASE.
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the backend is reachable.
    Health,

    /// Save a profile and list the matching stock picks.
    Picks(ProfileArgs),

    /// Save a profile, then ask one research question.
    Analyze {
        question: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Expand the validation trace panel.
        #[arg(long)]
        trace: bool,
    },

    /// Interactive session keeping profile and results between commands.
    Session,
}

#[derive(Debug, Clone, clap::Args)]
struct ProfileArgs {
    /// Investment budget in dollars.
    #[arg(long, default_value = capture::DEFAULT_BUDGET)]
    budget: String,

    #[arg(long, default_value = "medium")]
    risk: RiskLevel,

    #[arg(long, default_value = "6m")]
    horizon: Horizon,
}

impl ProfileArgs {
    fn form(&self) -> ProfileForm {
        let mut form = ProfileForm::default();
        form.set_budget(self.budget.clone());
        form.set_risk(self.risk);
        form.set_horizon(self.horizon);
        form
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let settings = finsight_core::config::Settings::from_env()?.with_api_base(args.api_base);
    let api = HttpFinsightClient::from_settings(&settings)?;
    tracing::debug!(api_base = %api.base_url(), timeout_secs = settings.timeout_secs, "client ready");

    match args.command {
        Command::Health => {
            let status = api.health().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Picks(profile) => {
            let mut controller = Controller::new();
            save_profile(&mut controller, &api, &profile).await?;
            print!("{}", view::screen(&controller, &TraceViewer::new()));
        }
        Command::Analyze {
            question,
            profile,
            trace,
        } => {
            let question = capture::question(&question)
                .ok_or_else(|| anyhow::anyhow!("question must not be empty"))?;

            let mut controller = Controller::new();
            save_profile(&mut controller, &api, &profile).await?;

            let mut trace_viewer = TraceViewer::new();
            if trace {
                trace_viewer.toggle();
            }

            eprintln!("Agent is researching... this may take 10-20 seconds.");
            let completion = controller.analyze(&api, &question).await;
            print!("{}", view::screen(&controller, &trace_viewer));
            if completion == Completion::Failed {
                anyhow::bail!("analysis failed");
            }
        }
        Command::Session => {
            session::run(&api).await?;
        }
    }

    Ok(())
}

async fn save_profile(
    controller: &mut Controller,
    api: &dyn FinsightApi,
    args: &ProfileArgs,
) -> anyhow::Result<()> {
    let profile = args.form().submit()?;
    let notification = controller.save_profile(api, profile).await;
    eprintln!("{}", view::notification(&notification));
    if notification.is_failure() {
        anyhow::bail!("profile was not saved");
    }
    Ok(())
}
