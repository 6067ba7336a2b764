//! Risk command - score the questionnaire without the web UI.

use anyhow::Result;
use clap::Args;
use glaucolens_core::domain::{MAX_AGE, MIN_AGE};
use glaucolens_core::{assess_risk, RiskInputs};
use serde::Serialize;

/// Arguments for the risk command
#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RiskArgs {
    /// Age in years (10-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(i64::from(MIN_AGE)..=i64::from(MAX_AGE)))]
    pub age: u32,

    /// Family history of glaucoma
    #[arg(long)]
    pub family_history: bool,

    /// Diagnosed diabetes
    #[arg(long)]
    pub diabetes: bool,

    /// Diagnosed high blood pressure
    #[arg(long)]
    pub high_bp: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct RiskReport<'a> {
    score: u8,
    tier: glaucolens_core::RiskTier,
    message: &'a str,
}

/// Run the risk command.
pub fn run(args: &RiskArgs) -> Result<()> {
    let inputs = RiskInputs::new(args.age, args.family_history, args.diabetes, args.high_bp);
    let assessment = assess_risk(&inputs);

    if args.json {
        let report = RiskReport {
            score: assessment.score,
            tier: assessment.tier,
            message: assessment.tier.message(),
        };
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("Risk score: {}", assessment.score);
        println!("Risk tier: {}", assessment.tier);
        println!("{}", assessment.tier.message());
    }

    Ok(())
}
