use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by the estimator.
    PrintSchemas,
    /// Create the artifacts layout quotes are written into.
    InitArtifacts {
        #[arg(long, default_value = "artifacts")]
        dir: String,
    },
    /// Bless golden fixtures (overwrite expected quotes).
    BlessFixtures,
    /// Quote the demo project end to end in a scratch directory.
    Smoke {
        #[arg(long, default_value = "target/xtask-smoke")]
        dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", estimator_types::schema::ESTIMATOR_PROJECT_V1);
            println!("{}", estimator_types::schema::ESTIMATOR_QUOTE_V1);
        }
        Command::InitArtifacts { dir } => {
            fs::create_dir_all(format!("{dir}/estimator")).with_context(|| format!("create {dir}"))?;
            println!("initialized {dir}/estimator");
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "estimator-domain", "--test", "golden_fixtures"])
                .env("ESTIMATOR_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
        Command::Smoke { dir } => {
            fs::create_dir_all(&dir).with_context(|| format!("create {dir}"))?;
            let project = format!("{dir}/project.json");
            let out_dir = format!("{dir}/out");
            cargo_run(&["init", "--force", "--path", &project])?;
            cargo_run(&["quote", "--project", &project, "--out-dir", &out_dir])?;
            println!("smoke quote written to {out_dir}/quote.json");
        }
    }
    Ok(())
}

fn cargo_run(args: &[&str]) -> anyhow::Result<()> {
    let status = ProcessCommand::new("cargo")
        .args(["run", "-q", "-p", "estimator", "--"])
        .args(args)
        .status()
        .with_context(|| format!("run estimator {}", args.join(" ")))?;
    if !status.success() {
        anyhow::bail!("estimator {} failed", args.join(" "));
    }
    Ok(())
}
