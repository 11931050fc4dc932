//! ef stats - directory row counts

use clap::Args;

use crate::app::AppContext;
use crate::error::Result;
use crate::storage::DirectoryStore;

#[derive(Args, Debug)]
pub struct StatsArgs {}

pub fn run(ctx: &AppContext, _args: &StatsArgs) -> Result<()> {
    let stats = DirectoryStore::new(&ctx.db).stats()?;

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({
                "employees": stats.employees,
                "teams": stats.teams,
                "skills": stats.skills,
                "ownerships": stats.ownerships,
            })
        );
    } else {
        println!("employees:  {}", stats.employees);
        println!("teams:      {}", stats.teams);
        println!("skills:     {}", stats.skills);
        println!("ownerships: {}", stats.ownerships);
    }
    Ok(())
}
