//! Default competency catalogue and the seeding policy.
//!
//! Seeded rows carry `seed_version`; user rows keep it NULL and are never
//! removed by seeding. Seeding only ever:
//! - inserts missing defaults while the table holds fewer than the threshold,
//! - refreshes rows seeded from an older catalogue version,
//! - drops rows seeded from an older catalogue whose code was retired.

use crate::db::record::Record;
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::models::Competency;
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, params};

/// Bump whenever DEFAULT_COMPETENCIES changes.
pub const SEED_VERSION: i64 = 2;

pub const DEFAULT_CATEGORY: &str = "Core";

pub struct DefaultCompetency {
    pub code: &'static str,
    pub description: &'static str,
}

pub const DEFAULT_COMPETENCIES: &[DefaultCompetency] = &[
    DefaultCompetency {
        code: "Routine animal care and husbandry",
        description: "Feeding, watering, daily checks",
    },
    DefaultCompetency {
        code: "Animal welfare and ethical practice",
        description: "Welfare decisions, humane care",
    },
    DefaultCompetency {
        code: "Observe and record behaviour/health",
        description: "Signals, monitoring, reporting",
    },
    DefaultCompetency {
        code: "Hygiene, cleaning, and biosecurity",
        description: "PPE, disinfecting, cross-contamination control",
    },
    DefaultCompetency {
        code: "Workplace health and safety (WHS)",
        description: "Hazards, manual handling, safe procedures",
    },
    DefaultCompetency {
        code: "Enrichment participation and evaluation",
        description: "Prep, delivery, response/outcomes",
    },
    DefaultCompetency {
        code: "Habitat/enclosure maintenance",
        description: "Safe upkeep, checks, environmental condition",
    },
    DefaultCompetency {
        code: "Safe handling and restraint",
        description: "Observed/assisted only where permitted",
    },
    DefaultCompetency {
        code: "Communication and record keeping",
        description: "Handover notes, clarity, documentation",
    },
    DefaultCompetency {
        code: "Visitor/operational safety",
        description: "Public impacts, safe boundaries in animal settings",
    },
];

/// The catalogue as insertable rows.
pub fn default_competencies() -> Vec<Competency> {
    DEFAULT_COMPETENCIES
        .iter()
        .enumerate()
        .map(|(i, d)| Competency {
            id: None,
            code: d.code.to_string(),
            description: d.description.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            active: Some(true),
            order: Some(i as i64),
            confidence: None,
            seed_version: Some(SEED_VERSION),
        })
        .collect()
}

fn find_default(code: &str) -> Option<(usize, &'static DefaultCompetency)> {
    DEFAULT_COMPETENCIES
        .iter()
        .enumerate()
        .find(|(_, d)| d.code.eq_ignore_ascii_case(code.trim()))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    pub inserted: usize,
    pub refreshed: usize,
    pub retired: usize,
}

impl SeedOutcome {
    pub fn changed(&self) -> bool {
        self.inserted + self.refreshed + self.retired > 0
    }
}

fn seed(conn: &mut Connection, threshold: usize) -> AppResult<SeedOutcome> {
    let tx = conn.transaction()?;
    let mut out = SeedOutcome::default();

    // 1) Rows seeded from an older catalogue
    let stale: Vec<(i64, String)> = {
        let mut stmt = tx.prepare(
            "SELECT id, code FROM competencies
             WHERE seed_version IS NOT NULL AND seed_version < ?1",
        )?;
        let rows = stmt.query_map([SEED_VERSION], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    for (id, code) in stale {
        match find_default(&code) {
            Some((_, def)) => {
                tx.execute(
                    "UPDATE competencies
                     SET code = ?1, description = ?2, category = ?3, seed_version = ?4
                     WHERE id = ?5",
                    params![def.code, def.description, DEFAULT_CATEGORY, SEED_VERSION, id],
                )?;
                out.refreshed += 1;
            }
            None => {
                tx.execute("DELETE FROM competencies WHERE id = ?1", [id])?;
                out.retired += 1;
            }
        }
    }

    // 2) Top up a sparse table with the missing defaults
    let count: i64 = tx.query_row("SELECT COUNT(*) FROM competencies", [], |row| row.get(0))?;
    if (count as usize) < threshold {
        for c in default_competencies() {
            let exists: bool = tx
                .prepare_cached("SELECT 1 FROM competencies WHERE code = ?1 COLLATE NOCASE")?
                .exists([&c.code])?;
            if !exists {
                Competency::insert(&tx, &c)?;
                out.inserted += 1;
            }
        }
    }

    if out.changed() {
        crate::db::log::ttlog(
            &tx,
            "seed",
            "competencies",
            &format!(
                "Seeded defaults v{}: {} inserted, {} refreshed, {} retired",
                SEED_VERSION, out.inserted, out.refreshed, out.retired
            ),
        )?;
    }

    tx.commit()?;
    Ok(out)
}

impl Store {
    /// Install or upgrade the default catalogue. Never fails: problems are
    /// reported as warnings and an empty outcome is returned.
    pub fn seed_competencies(&mut self, threshold: usize) -> SeedOutcome {
        let res = self.conn_mut().and_then(|conn| seed(conn, threshold));
        match res {
            Ok(out) => {
                if out.changed() {
                    self.notify(&[Competency::TABLE]);
                }
                out
            }
            Err(e) => {
                warning(format!("Competency seeding skipped: {}", e));
                SeedOutcome::default()
            }
        }
    }

    /// Explicit "restore defaults": replaces every competency, user rows included.
    pub fn reset_competencies(&mut self) -> AppResult<usize> {
        let defaults = default_competencies();
        let tx = self.conn_mut()?.transaction()?;
        tx.execute("DELETE FROM competencies", [])?;
        for c in &defaults {
            Competency::insert(&tx, c)?;
        }
        crate::db::log::ttlog(
            &tx,
            "reset",
            "competencies",
            "Competencies replaced with the default catalogue",
        )?;
        tx.commit()?;

        self.notify(&[Competency::TABLE]);
        success("Default competencies restored.");
        Ok(defaults.len())
    }
}
