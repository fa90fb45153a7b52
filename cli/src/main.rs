//! ballot command-line host.
//!
//! Wraps one `SessionWorkflow` in a blocking stdin command loop. The
//! administrator identity and the seed voter list come from a TOML config
//! file and/or flags; administrative commands run as the configured
//! administrator, participant commands name their caller explicitly.
//!
//! The core is a synchronous library; this host is single threaded, so
//! mutating operations are trivially serialized.

use anyhow::Context;
use ballot_session::{RestartMode, SessionWorkflow, TracingSink};
use ballot_types::{ProposalId, SingleAdmin, VoterAddress};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ballot", about = "single-session voting workflow host")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Administrator identity.
    #[arg(long, env = "BALLOT_ADMIN")]
    admin: Option<String>,

    /// Seed voter identities (comma-separated or repeated).
    #[arg(long = "voter", env = "BALLOT_VOTERS", value_delimiter = ',')]
    voters: Vec<String>,

    /// Log filter when RUST_LOG is unset: "trace", "debug", "info",
    /// "warn", "error".
    #[arg(long, default_value = "info", env = "BALLOT_LOG_LEVEL")]
    log_level: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct SessionConfig {
    admin: Option<String>,
    #[serde(default)]
    voters: Vec<String>,
}

enum Outcome {
    Continue,
    Quit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    ballot_utils::init_tracing(&cli.log_level);

    let file_config: SessionConfig = match &cli.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    let admin = VoterAddress::new(
        cli.admin
            .or(file_config.admin)
            .context("no administrator configured: pass --admin or set it in the config file")?,
    );
    let seed = if cli.voters.is_empty() {
        file_config.voters
    } else {
        cli.voters
    };

    tracing::info!(%admin, seed_voters = seed.len(), "starting ballot session");
    let mut session = SessionWorkflow::seeded(
        Box::new(SingleAdmin::new(admin.clone())),
        Box::new(TracingSink),
        seed.into_iter().map(VoterAddress::new),
    );

    println!("ballot session ready — type 'help' for commands");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();
        match run_command(&mut session, &admin, command, &args) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Quit) => break,
            Err(e) => eprintln!("error: {e}"),
        }
        io::stdout().flush()?;
    }
    Ok(())
}

fn run_command(
    session: &mut SessionWorkflow,
    admin: &VoterAddress,
    command: &str,
    args: &[&str],
) -> anyhow::Result<Outcome> {
    match command {
        "help" => print_help(),
        "phase" => println!("{}", session.phase()),

        "add-voter" => {
            session.add_voter(admin, VoterAddress::new(arg(args, 0, "voter")?))?;
            println!("ok");
        }
        "remove-voter" => {
            session.remove_voter(admin, &VoterAddress::new(arg(args, 0, "voter")?))?;
            println!("ok");
        }
        "unregister" => {
            session.unregister_voter(admin, &VoterAddress::new(arg(args, 0, "voter")?))?;
            println!("ok");
        }
        "register" => {
            session.register_voter(admin, &VoterAddress::new(arg(args, 0, "voter")?))?;
            println!("ok");
        }
        "voter" => {
            let record = session.voter(&VoterAddress::new(arg(args, 0, "voter")?))?;
            println!("{}", serde_json::to_string(record)?);
        }

        "open-proposals" => {
            session.open_proposals(admin)?;
            println!("{}", session.phase());
        }
        "close-proposals" => {
            session.close_proposals(admin)?;
            println!("{}", session.phase());
        }
        "open-voting" => {
            session.open_voting(admin)?;
            println!("{}", session.phase());
        }
        "close-voting" => {
            session.close_voting(admin)?;
            println!("{}", session.phase());
        }

        "propose" => {
            let caller = VoterAddress::new(arg(args, 0, "caller")?);
            let description = args
                .get(1..)
                .filter(|rest| !rest.is_empty())
                .context("usage: propose <caller> <description>")?
                .join(" ");
            let id = session.add_proposal(&caller, description)?;
            println!("proposal {id}");
        }
        "vote" => {
            let caller = VoterAddress::new(arg(args, 0, "caller")?);
            session.cast_vote(&caller, proposal_id(arg(args, 1, "proposal id")?)?)?;
            println!("ok");
        }
        "change-vote" => {
            let caller = VoterAddress::new(arg(args, 0, "caller")?);
            session.change_vote(&caller, proposal_id(arg(args, 1, "proposal id")?)?)?;
            println!("ok");
        }
        "proposals" => {
            println!("{}", serde_json::to_string_pretty(session.proposals())?);
        }

        "tally" => {
            let winner = session.tally(admin)?;
            if winner.is_none() {
                println!("no winner");
            } else {
                println!("winner: proposal {winner}");
            }
        }
        "winner" => {
            println!("winner: proposal {}", session.winner()?);
        }
        "restart" => {
            let mode = match args.first().copied() {
                Some("purge") => RestartMode::PurgeVoters,
                Some("retain") | None => RestartMode::RetainVoters,
                Some(other) => anyhow::bail!("unknown restart mode '{other}' (purge|retain)"),
            };
            session.restart(admin, mode)?;
            println!("{}", session.phase());
        }

        "save" => {
            let path = arg(args, 0, "path")?;
            std::fs::write(path, session.save_state())
                .with_context(|| format!("writing snapshot to {path}"))?;
            println!("saved");
        }
        "load" => {
            let path = arg(args, 0, "path")?;
            let bytes =
                std::fs::read(path).with_context(|| format!("reading snapshot from {path}"))?;
            *session = SessionWorkflow::load_state(
                &bytes,
                Box::new(SingleAdmin::new(admin.clone())),
                Box::new(TracingSink),
            );
            println!("loaded — phase {}", session.phase());
        }

        "quit" | "exit" => return Ok(Outcome::Quit),
        other => anyhow::bail!("unknown command '{other}' — type 'help'"),
    }
    Ok(Outcome::Continue)
}

fn arg<'a>(args: &[&'a str], index: usize, name: &str) -> anyhow::Result<&'a str> {
    args.get(index)
        .copied()
        .with_context(|| format!("missing argument: {name}"))
}

fn proposal_id(raw: &str) -> anyhow::Result<ProposalId> {
    let id: u32 = raw
        .parse()
        .with_context(|| format!("'{raw}' is not a proposal id"))?;
    Ok(ProposalId::new(id))
}

fn print_help() {
    println!(
        "\
commands:
  phase                          show the current phase
  add-voter <id>                 whitelist and register a voter
  remove-voter <id>              delete a voter outright
  unregister <id>                drop a voter's registration
  register <id>                  restore a voter's registration
  voter <id>                     show a voter record
  open-proposals                 advance to proposal registration
  close-proposals                close proposal registration
  open-voting                    advance to voting
  close-voting                   close voting
  propose <caller> <text>        submit a proposal
  vote <caller> <id>             cast a vote
  change-vote <caller> <id>      move a counted vote
  proposals                      list proposals with counts
  tally                          compute and store the winner
  winner                         show the tallied winner
  restart [purge|retain]         start a new round (default: retain)
  save <path> / load <path>      snapshot the session state
  quit"
    );
}
