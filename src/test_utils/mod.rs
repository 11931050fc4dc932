//! Fixture builders shared by unit and integration tests.

use crate::error::Result;
use crate::model::{OwnershipKind, Proficiency};
use crate::storage::directory::NewEmployee;
use crate::storage::{Database, DirectoryStore};

/// A directory with three Billing Operations employees, five others, a
/// people-leader chain, skills, and the "bia provisioning" ownership pair.
/// Matches the shapes exercised by the scenario tests.
pub fn fixture_database() -> Result<Database> {
    let db = Database::open_in_memory()?;
    {
        let store = DirectoryStore::new(&db);

        let lead = insert(&store, "Morgan Vale", "morgan.vale@company.co", "Engineering Manager", "Platform", None)?;
        let alice = insert(&store, "Alice Johnson", "alice.j@company.co", "Network Engineer", "Network Operations", Some(lead))?;
        let ben = insert(&store, "Ben Okafor", "ben.okafor@company.co", "Provisioning Specialist", "Service Delivery", Some(lead))?;

        insert(&store, "Dana Brook", "dana.brook@company.co", "Billing Analyst", "Billing Operations", Some(lead))?;
        insert(&store, "Evan Cole", "evan.cole@company.co", "Billing Specialist", "Billing Operations", Some(lead))?;
        insert(&store, "Fiona Adams", "fiona.adams@company.co", "Revenue Analyst", "Billing Operations", Some(lead))?;

        insert(&store, "Greg Holt", "greg.holt@company.co", "Sales Lead", "Commercial", Some(lead))?;
        insert(&store, "Hana Ito", "hana.ito@company.co", "Product Manager", "Product", Some(lead))?;

        store.upsert_skill(alice, "networking", Proficiency::Expert, true)?;
        store.upsert_skill(ben, "deployment", Proficiency::Advanced, true)?;

        store.insert_ownership(ben, "bia provisioning", OwnershipKind::Primary)?;
        store.insert_ownership(alice, "bia provisioning", OwnershipKind::Backup)?;
    }
    Ok(db)
}

fn insert(
    store: &DirectoryStore<'_>,
    name: &str,
    email: &str,
    title: &str,
    team: &str,
    leader: Option<i64>,
) -> Result<i64> {
    store.insert_employee(&NewEmployee {
        formal_name: name,
        email_address: email,
        position_title: title,
        function: Some("Technology"),
        business_unit: Some("Digital"),
        team: Some(team),
        location: Some("Auckland"),
        people_leader_id: leader,
    })
}
