//! Versioned schema migrations, tracked via `PRAGMA user_version`.

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: u32 = 1;

/// Run all pending migrations, returning the resulting schema version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current < 1 {
        migrate_v1(conn)?;
        conn.pragma_update(None, "user_version", 1)?;
    }

    Ok(SCHEMA_VERSION)
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            formal_name      TEXT NOT NULL,
            email_address    TEXT NOT NULL UNIQUE,
            position_title   TEXT NOT NULL,
            function         TEXT,
            business_unit    TEXT,
            team             TEXT,
            location         TEXT,
            people_leader_id INTEGER REFERENCES employees(id),
            is_active        INTEGER NOT NULL DEFAULT 1,
            created_at       TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_employees_team ON employees(team);
        CREATE INDEX IF NOT EXISTS idx_employees_function ON employees(function);

        CREATE TABLE IF NOT EXISTS skills (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS employee_skills (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id       INTEGER NOT NULL REFERENCES employees(id),
            skill_id          INTEGER NOT NULL REFERENCES skills(id),
            proficiency_level TEXT NOT NULL
                CHECK (proficiency_level IN ('awareness','skilled','advanced','expert')),
            is_verified       INTEGER NOT NULL DEFAULT 0,
            verified_by       INTEGER REFERENCES employees(id),
            UNIQUE (employee_id, skill_id)
        );

        CREATE TABLE IF NOT EXISTS role_ownership (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id         INTEGER NOT NULL REFERENCES employees(id),
            responsibility_area TEXT NOT NULL,
            ownership_kind      TEXT NOT NULL DEFAULT 'primary'
                CHECK (ownership_kind IN ('primary','backup','escalation')),
            is_active           INTEGER NOT NULL DEFAULT 1,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- At most one active primary owner per area.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_ro_one_primary
            ON role_ownership(responsibility_area)
            WHERE ownership_kind = 'primary' AND is_active = 1;

        CREATE VIRTUAL TABLE IF NOT EXISTS employees_fts USING fts5(
            formal_name,
            email_address,
            position_title,
            function,
            business_unit,
            team,
            location,
            content='employees',
            content_rowid='id'
        );

        CREATE TRIGGER IF NOT EXISTS employees_ai AFTER INSERT ON employees BEGIN
            INSERT INTO employees_fts(rowid, formal_name, email_address, position_title,
                                      function, business_unit, team, location)
            VALUES (new.id, new.formal_name, new.email_address, new.position_title,
                    new.function, new.business_unit, new.team, new.location);
        END;

        CREATE TRIGGER IF NOT EXISTS employees_ad AFTER DELETE ON employees BEGIN
            INSERT INTO employees_fts(employees_fts, rowid, formal_name, email_address,
                                      position_title, function, business_unit, team, location)
            VALUES ('delete', old.id, old.formal_name, old.email_address, old.position_title,
                    old.function, old.business_unit, old.team, old.location);
        END;

        CREATE TRIGGER IF NOT EXISTS employees_au AFTER UPDATE ON employees BEGIN
            INSERT INTO employees_fts(employees_fts, rowid, formal_name, email_address,
                                      position_title, function, business_unit, team, location)
            VALUES ('delete', old.id, old.formal_name, old.email_address, old.position_title,
                    old.function, old.business_unit, old.team, old.location);
            INSERT INTO employees_fts(rowid, formal_name, email_address, position_title,
                                      function, business_unit, team, location)
            VALUES (new.id, new.formal_name, new.email_address, new.position_title,
                    new.function, new.business_unit, new.team, new.location);
        END;
        "#,
    )?;
    Ok(())
}
