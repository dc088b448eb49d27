use crate::view;
use anyhow::{bail, Context};
use finsight_core::capture::{self, ProfileForm};
use finsight_core::client::FinsightApi;
use finsight_core::controller::Controller;
use finsight_core::domain::profile::{Horizon, RiskLevel};
use finsight_core::trace::TraceViewer;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  profile <budget> [low|medium|high] [1m|6m|1y]   save profile and fetch picks
  ask <question>                                   research one stock
  trace                                            expand or collapse the debug trace
  state                                            redraw the screen
  health                                           check the backend
  help                                             show this text
  quit                                             leave the session";

#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Profile {
        budget: String,
        risk: Option<RiskLevel>,
        horizon: Option<Horizon>,
    },
    Ask(String),
    Trace,
    State,
    Health,
    Help,
    Quit,
}

fn parse_command(line: &str) -> anyhow::Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let cmd = match head.to_ascii_lowercase().as_str() {
        "profile" => {
            let mut parts = rest.split_whitespace();
            let Some(budget) = parts.next() else {
                bail!("usage: profile <budget> [risk] [horizon]");
            };
            let risk = parts.next().map(str::parse).transpose()?;
            let horizon = parts.next().map(str::parse).transpose()?;
            if parts.next().is_some() {
                bail!("usage: profile <budget> [risk] [horizon]");
            }
            SessionCommand::Profile {
                budget: budget.to_string(),
                risk,
                horizon,
            }
        }
        "ask" => match capture::question(rest) {
            Some(q) => SessionCommand::Ask(q),
            None => bail!("usage: ask <question>"),
        },
        "trace" => SessionCommand::Trace,
        "state" => SessionCommand::State,
        "health" => SessionCommand::Health,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("unknown command {other:?}, try `help`"),
    };
    Ok(Some(cmd))
}

pub async fn run(api: &dyn FinsightApi) -> anyhow::Result<()> {
    let mut controller = Controller::new();
    let mut trace_viewer = TraceViewer::new();
    let mut form = ProfileForm::default();

    println!("FinSight session. Type `help` for commands.");
    print!("{}", view::screen(&controller, &trace_viewer));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match cmd {
            SessionCommand::Profile {
                budget,
                risk,
                horizon,
            } => {
                form.set_budget(budget);
                if let Some(risk) = risk {
                    form.set_risk(risk);
                }
                if let Some(horizon) = horizon {
                    form.set_horizon(horizon);
                }
                let profile = match form.submit() {
                    Ok(profile) => profile,
                    Err(err) => {
                        println!("{err:#}");
                        continue;
                    }
                };
                let notification = controller.save_profile(api, profile).await;
                println!("{}", view::notification(&notification));
                controller.take_notification();
                print!("{}", view::screen(&controller, &trace_viewer));
            }
            SessionCommand::Ask(question) => {
                if !controller.analysis_locked() {
                    println!("Agent is researching... this may take 10-20 seconds.");
                }
                let completion = controller.analyze(api, &question).await;
                tracing::debug!(?completion, "analysis finished");
                print!("{}", view::screen(&controller, &trace_viewer));
            }
            SessionCommand::Trace => {
                trace_viewer.toggle();
                match trace_viewer.view(controller.state().result.as_ref()) {
                    Some(trace) => print!("{}", view::trace(&trace)),
                    None => println!("no analysis to trace yet"),
                }
            }
            SessionCommand::State => {
                print!("{}", view::screen(&controller, &trace_viewer));
            }
            SessionCommand::Health => match api.health().await {
                Ok(status) => println!("{status}"),
                Err(err) => println!("{err:#}"),
            },
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => break,
        }
    }

    Ok(())
}
