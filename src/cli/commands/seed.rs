//! ef seed - load a small demo directory

use clap::Args;

use crate::app::AppContext;
use crate::error::Result;
use crate::model::{OwnershipKind, Proficiency};
use crate::storage::directory::NewEmployee;
use crate::storage::DirectoryStore;

#[derive(Args, Debug)]
pub struct SeedArgs {}

pub fn run(ctx: &AppContext, _args: &SeedArgs) -> Result<()> {
    let store = DirectoryStore::new(&ctx.db);

    let lead = store.insert_employee(&NewEmployee {
        formal_name: "Morgan Vale",
        email_address: "morgan.vale@company.co",
        position_title: "Engineering Manager",
        function: Some("Technology"),
        business_unit: Some("Digital"),
        team: Some("Platform"),
        location: Some("Auckland"),
        people_leader_id: None,
    })?;

    let alice = store.insert_employee(&NewEmployee {
        formal_name: "Alice Johnson",
        email_address: "alice.j@company.co",
        position_title: "Network Engineer",
        function: Some("Technology"),
        business_unit: Some("Digital"),
        team: Some("Network Operations"),
        location: Some("Auckland"),
        people_leader_id: Some(lead),
    })?;

    let ben = store.insert_employee(&NewEmployee {
        formal_name: "Ben Okafor",
        email_address: "ben.okafor@company.co",
        position_title: "Provisioning Specialist",
        function: Some("Technology"),
        business_unit: Some("Digital"),
        team: Some("Service Delivery"),
        location: Some("Wellington"),
        people_leader_id: Some(lead),
    })?;

    let cara = store.insert_employee(&NewEmployee {
        formal_name: "Cara Singh",
        email_address: "cara.singh@company.co",
        position_title: "Billing Analyst",
        function: Some("Finance"),
        business_unit: Some("Commercial"),
        team: Some("Billing Operations"),
        location: Some("Auckland"),
        people_leader_id: Some(lead),
    })?;

    store.upsert_skill(alice, "networking", Proficiency::Expert, true)?;
    store.upsert_skill(alice, "provisioning", Proficiency::Skilled, false)?;
    store.upsert_skill(ben, "provisioning", Proficiency::Advanced, true)?;
    store.upsert_skill(cara, "billing", Proficiency::Advanced, true)?;

    store.insert_ownership(ben, "bia provisioning", OwnershipKind::Primary)?;
    store.insert_ownership(alice, "bia provisioning", OwnershipKind::Backup)?;
    store.insert_ownership(cara, "billing operations", OwnershipKind::Primary)?;

    let stats = store.stats()?;
    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({
                "employees": stats.employees,
                "skills": stats.skills,
                "ownerships": stats.ownerships,
            })
        );
    } else {
        println!(
            "Seeded demo directory: {} employees, {} skills, {} ownership records.",
            stats.employees, stats.skills, stats.ownerships
        );
    }
    Ok(())
}
