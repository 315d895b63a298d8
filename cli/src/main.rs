//! hanafuda-settle: settle one round from the command line
//!
//! ```text
//! hanafuda-settle <rules.json|preset> <round.json>
//! ```
//!
//! The round file holds the roster under `players` next to the round input
//! fields. The settlement result is printed as JSON on stdout; warnings go to
//! stderr.

use anyhow::{bail, Context, Result};
use hanafuda_settlement_core_rs::{settle_round, Roster, RoundInput, RulePreset, RuleSet};
use serde::Deserialize;
use std::fs;

const USAGE: &str = "usage: hanafuda-settle <rules.json|preset> <round.json>";

#[derive(Deserialize)]
struct RoundFile {
    players: Vec<String>,
    #[serde(flatten)]
    round: RoundInput,
}

fn load_rules(arg: &str) -> Result<RuleSet> {
    if let Ok(preset) = arg.parse::<RulePreset>() {
        return Ok(preset.load());
    }
    let json = fs::read_to_string(arg).with_context(|| format!("reading rules from {}", arg))?;
    Ok(RuleSet::from_json(&json)?)
}

fn run(args: &[String]) -> Result<()> {
    let [rules_arg, round_arg] = args else {
        bail!(USAGE);
    };

    let rules = load_rules(rules_arg)?;
    let json =
        fs::read_to_string(round_arg).with_context(|| format!("reading round from {}", round_arg))?;
    let file: RoundFile = serde_json::from_str(&json).context("parsing round file")?;
    let roster = Roster::new(&file.players)?;

    let result = settle_round(&rules, &roster, &file.round)?;
    for warning in result.warnings() {
        eprintln!("warning: {}", serde_json::to_string(warning)?);
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
