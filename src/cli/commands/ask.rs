//! ef ask - run one query against the directory

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::finder::EmployeeFinder;
use crate::model::FinderResponse;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The query, e.g. "who owns bia provisioning"
    pub query: String,

    /// Maximum number of candidates
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// Opaque session identifier for correlating queries
    #[arg(long)]
    pub session: Option<String>,
}

pub fn run(ctx: &AppContext, args: &AskArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(limit) = args.limit {
        config.finder.max_recommendations = limit;
    }

    let finder = EmployeeFinder::new(&ctx.db, ctx.provider.as_ref(), &config);
    let response = finder.process_query(&args.query, args.session.as_deref())?;

    if ctx.robot_mode {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_human(&response);
    }
    Ok(())
}

fn print_human(response: &FinderResponse) {
    println!("{}", response.understanding_summary.bold());
    println!();

    if !response.recommended_role_labels.is_empty() {
        println!(
            "{} {}",
            "Recommended roles:".cyan(),
            response.recommended_role_labels.join(", ")
        );
        println!();
    }

    if response.candidates.is_empty() {
        println!("{}", "No matching people found.".yellow());
    } else {
        for (position, candidate) in response.candidates.iter().enumerate() {
            let header = format!(
                "{}. {} <{}> - {}",
                position + 1,
                candidate.employee.formal_name,
                candidate.employee.email_address,
                candidate.employee.position_title,
            );
            println!("{}", header.green());
            println!("   score {:.2}", candidate.score);
            for reason in &candidate.reasons {
                println!("   - {reason}");
            }
            if let Some(contact) = &candidate.escalation_contact {
                println!(
                    "   escalation: {} <{}>",
                    contact.formal_name, contact.email_address
                );
            }
        }
    }

    println!();
    println!("{} {:?}", "Confidence:".cyan(), response.confidence_label);
    for hint in &response.next_step_hints {
        println!("{} {hint}", "hint:".blue());
    }
    println!();
    println!("{}", response.disclaimer.dimmed());
}
