//! Read surface over the employee directory.
//!
//! Every query here is a pure read; the only writers are the import/seed
//! helpers at the bottom, which the query pipeline never calls.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::error::Result;
use crate::model::{Employee, OwnershipKind, OwnershipRecord, Proficiency, SkillRecord};
use crate::storage::Database;

/// Organizational label field targeted by a pattern search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    Team,
    Function,
    Location,
    Title,
}

impl LabelField {
    fn column(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Function => "function",
            Self::Location => "location",
            Self::Title => "position_title",
        }
    }
}

const EMPLOYEE_COLUMNS: &str = "id, formal_name, email_address, position_title, function, \
     business_unit, team, location, people_leader_id, is_active, created_at, updated_at";

// Same projection qualified for joins where `e` aliases employees.
const EMPLOYEE_COLUMNS_E: &str = "e.id, e.formal_name, e.email_address, e.position_title, \
     e.function, e.business_unit, e.team, e.location, e.people_leader_id, e.is_active, \
     e.created_at, e.updated_at";

pub struct DirectoryStore<'a> {
    db: &'a Database,
}

impl<'a> DirectoryStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Exact-key lookup. Not-found is `None`, never an error.
    pub fn employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE email_address = ?1 COLLATE NOCASE AND is_active = 1"
        );
        let row = self
            .db
            .conn()
            .query_row(&sql, params![email], row_to_employee)
            .optional()?;
        Ok(row)
    }

    pub fn employee_by_id(&self, id: i64) -> Result<Option<Employee>> {
        let sql =
            format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?1 AND is_active = 1");
        let row = self
            .db
            .conn()
            .query_row(&sql, params![id], row_to_employee)
            .optional()?;
        Ok(row)
    }

    /// One-hop manager lookup. Never recursive: the leader chain may be
    /// arbitrarily deep (or corrupt) and the read path does not traverse it.
    pub fn manager_of(&self, employee: &Employee) -> Result<Option<Employee>> {
        match employee.people_leader_id {
            Some(id) => self.employee_by_id(id),
            None => Ok(None),
        }
    }

    /// Case-insensitive substring match on one organizational label field,
    /// ordered by name for determinism.
    pub fn employees_by_label(&self, field: LabelField, needle: &str) -> Result<Vec<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE {} LIKE ?1 ESCAPE '\\' AND is_active = 1 \
             ORDER BY formal_name",
            field.column()
        );
        let pattern = format!("%{}%", escape_like(needle.trim()));
        let mut stmt = self.db.conn().prepare(&sql)?;
        let rows = stmt
            .query_map(params![pattern], row_to_employee)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Active ownership rows whose area contains the phrase, joined with the
    /// owning employee. Ordered primary, backup, escalation, then name.
    pub fn owners_by_area(&self, phrase: &str) -> Result<Vec<OwnershipRecord>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS_E}, ro.responsibility_area, ro.ownership_kind \
             FROM employees e \
             JOIN role_ownership ro ON e.id = ro.employee_id \
             WHERE ro.responsibility_area LIKE ?1 ESCAPE '\\' \
               AND ro.is_active = 1 AND e.is_active = 1 \
             ORDER BY \
               CASE ro.ownership_kind \
                 WHEN 'primary' THEN 1 WHEN 'backup' THEN 2 ELSE 3 \
               END, e.formal_name"
        );
        let pattern = format!("%{}%", escape_like(&phrase.trim().to_lowercase()));
        let mut stmt = self.db.conn().prepare(&sql)?;
        let rows = stmt
            .query_map(params![pattern], |row| {
                let employee = row_to_employee(row)?;
                let area: String = row.get(12)?;
                let kind: String = row.get(13)?;
                Ok((employee, area, kind))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(employee, area, kind)| {
                OwnershipKind::parse(&kind).map(|kind| OwnershipRecord {
                    employee,
                    responsibility_area: area,
                    kind,
                })
            })
            .collect())
    }

    /// All active employees, ordered by name.
    pub fn active_employees(&self) -> Result<Vec<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE is_active = 1 ORDER BY formal_name"
        );
        let mut stmt = self.db.conn().prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_employee)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every skill record for active employees. The skill strategy consumes
    /// this as an in-memory matrix keyed by (employee, lowercased skill name).
    pub fn skill_records(&self) -> Result<Vec<SkillRecord>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT es.employee_id, s.name, es.proficiency_level, es.is_verified \
             FROM employee_skills es \
             JOIN skills s ON s.id = es.skill_id \
             JOIN employees e ON e.id = es.employee_id \
             WHERE e.is_active = 1",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let employee_id: i64 = row.get(0)?;
                let skill_name: String = row.get(1)?;
                let level: String = row.get(2)?;
                let is_verified: bool = row.get(3)?;
                Ok((employee_id, skill_name, level, is_verified))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(employee_id, skill_name, level, is_verified)| {
                Proficiency::parse(&level).map(|proficiency| SkillRecord {
                    employee_id,
                    skill_name,
                    proficiency,
                    is_verified,
                })
            })
            .collect())
    }

    /// Ranked full-text search across the indexed employee fields. Results
    /// come back best-first in the index's native rank order.
    pub fn fulltext(&self, query: &str, limit: usize) -> Result<Vec<Employee>> {
        let Some(fts_query) = build_fts_query(query) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS_E} FROM employees e \
             JOIN employees_fts ON e.id = employees_fts.rowid \
             WHERE employees_fts MATCH ?1 AND e.is_active = 1 \
             ORDER BY rank \
             LIMIT ?2"
        );
        let mut stmt = self.db.conn().prepare(&sql)?;
        let result = stmt
            .query_map(params![fts_query, limit as i64], row_to_employee)
            .and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>());

        // A query made entirely of stop tokens or odd syntax can still upset
        // the FTS parser; treat that as zero matches, not a request failure.
        match result {
            Ok(rows) => Ok(rows),
            Err(err) => {
                tracing::debug!("fts query rejected ({fts_query:?}): {err}");
                Ok(Vec::new())
            }
        }
    }

    pub fn stats(&self) -> Result<DirectoryStats> {
        let conn = self.db.conn();
        let employees: i64 = conn.query_row(
            "SELECT COUNT(*) FROM employees WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;
        let teams: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT team) FROM employees WHERE is_active = 1 AND team IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        let skills: i64 = conn.query_row("SELECT COUNT(*) FROM skills", [], |row| row.get(0))?;
        let ownerships: i64 = conn.query_row(
            "SELECT COUNT(*) FROM role_ownership WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(DirectoryStats {
            employees,
            teams,
            skills,
            ownerships,
        })
    }

    // ---- import/seed writers (not used by the query pipeline) ----

    pub fn insert_employee(&self, employee: &NewEmployee<'_>) -> Result<i64> {
        self.db.conn().execute(
            "INSERT INTO employees \
             (formal_name, email_address, position_title, function, business_unit, \
              team, location, people_leader_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                employee.formal_name,
                employee.email_address,
                employee.position_title,
                employee.function,
                employee.business_unit,
                employee.team,
                employee.location,
                employee.people_leader_id,
            ],
        )?;
        Ok(self.db.conn().last_insert_rowid())
    }

    pub fn upsert_skill(
        &self,
        employee_id: i64,
        skill_name: &str,
        proficiency: Proficiency,
        verified: bool,
    ) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT OR IGNORE INTO skills (name) VALUES (?1)",
            params![skill_name],
        )?;
        let skill_id: i64 = conn.query_row(
            "SELECT id FROM skills WHERE name = ?1",
            params![skill_name],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO employee_skills (employee_id, skill_id, proficiency_level, is_verified) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (employee_id, skill_id) \
             DO UPDATE SET proficiency_level = excluded.proficiency_level, \
                           is_verified = excluded.is_verified",
            params![employee_id, skill_id, proficiency.as_str(), verified],
        )?;
        Ok(())
    }

    pub fn insert_ownership(
        &self,
        employee_id: i64,
        area: &str,
        kind: OwnershipKind,
    ) -> Result<()> {
        self.db.conn().execute(
            "INSERT INTO role_ownership (employee_id, responsibility_area, ownership_kind) \
             VALUES (?1, ?2, ?3)",
            params![employee_id, area.to_lowercase(), kind.as_str()],
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DirectoryStats {
    pub employees: i64,
    pub teams: i64,
    pub skills: i64,
    pub ownerships: i64,
}

/// Insert payload for the seed/import path.
#[derive(Debug, Clone, Copy)]
pub struct NewEmployee<'a> {
    pub formal_name: &'a str,
    pub email_address: &'a str,
    pub position_title: &'a str,
    pub function: Option<&'a str>,
    pub business_unit: Option<&'a str>,
    pub team: Option<&'a str>,
    pub location: Option<&'a str>,
    pub people_leader_id: Option<i64>,
}

fn row_to_employee(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        formal_name: row.get(1)?,
        email_address: row.get(2)?,
        position_title: row.get(3)?,
        function: row.get(4)?,
        business_unit: row.get(5)?,
        team: row.get(6)?,
        location: row.get(7)?,
        people_leader_id: row.get(8)?,
        is_active: row.get(9)?,
        created_at: parse_timestamp(row.get::<_, Option<String>>(10)?),
        updated_at: parse_timestamp(row.get::<_, Option<String>>(11)?),
    })
}

/// Parse the `datetime('now')` column format. Rows touched by hand can hold
/// anything; an unparseable value reads as absent, not as a row error.
fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    let value = value?;
    NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Escape `LIKE` wildcards in a user-extracted span so "%" or "_" in a query
/// matches literally instead of everything.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Strip FTS5 operator characters and OR-join the remaining words as quoted
/// terms, so arbitrary user text cannot produce a syntax error.
fn build_fts_query(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '@' || c == '.' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let terms: Vec<String> = cleaned
        .split_whitespace()
        .map(|word| format!("\"{word}\""))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}
