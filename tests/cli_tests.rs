use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_journal, kl, out_path, test_home};

#[test]
fn test_init_seeds_competencies() {
    let home = test_home("cli_init");
    let db = common::db_path(&home);

    kl(&home)
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("10 competencies"))
        .stdout(contains("initialization completed"));

    kl(&home)
        .args(["--db", &db, "competency", "list"])
        .assert()
        .success()
        .stdout(contains("Workplace health and safety (WHS)"));
}

#[test]
fn test_session_lifecycle() {
    let home = test_home("cli_session");
    let db = init_journal(&home);

    kl(&home)
        .args([
            "--db", &db, "session", "start", "--facility", "Taronga Zoo", "--date",
            "2024-03-01", "--at", "09:00",
        ])
        .assert()
        .success()
        .stdout(contains("Session #1 started at Taronga Zoo"));

    // a second active session is refused
    kl(&home)
        .args(["--db", &db, "session", "start", "--facility", "Elsewhere"])
        .assert()
        .failure()
        .stderr(contains("still active"));

    kl(&home)
        .args([
            "--db", &db, "capture", "add", "Checked the barrier locks", "--tag", "WHS",
        ])
        .assert()
        .success()
        .stdout(contains("Capture #1 (text) added to session #1"));

    kl(&home)
        .args([
            "--db",
            &db,
            "session",
            "complete",
            "--end",
            "11:05",
            "--q1",
            "Fed koalas",
            "--competency",
            "Workplace health and safety (WHS)",
        ])
        .assert()
        .success()
        .stdout(contains("2h 5m"));

    kl(&home)
        .args(["--db", &db, "session", "list"])
        .assert()
        .success()
        .stdout(contains("2024-03-01").and(contains("completed")));

    kl(&home)
        .args(["--db", &db, "session", "show", "1"])
        .assert()
        .success()
        .stdout(contains("Fed koalas").and(contains("Checked the barrier locks")));

    kl(&home)
        .args(["--db", &db, "skills", "--search", "whs"])
        .assert()
        .success()
        .stdout(contains("Workplace health and safety (WHS)"));
}

#[test]
fn test_complete_without_active_session_fails() {
    let home = test_home("cli_no_active");
    let db = init_journal(&home);

    kl(&home)
        .args(["--db", &db, "session", "complete"])
        .assert()
        .failure()
        .stderr(contains("no active session"));
}

#[test]
fn test_private_photo_is_withheld() {
    let home = test_home("cli_private_photo");
    let db = init_journal(&home);

    kl(&home)
        .args(["--db", &db, "session", "start", "--facility", "Zoo"])
        .assert()
        .success();
    kl(&home)
        .args([
            "--db",
            &db,
            "capture",
            "add",
            "Keeper at the gate",
            "--type",
            "photo",
            "--media",
            "data:image/png;base64,AAAA",
        ])
        .assert()
        .success()
        .stdout(contains("stays private"));

    kl(&home)
        .args(["--db", &db, "session", "show", "1"])
        .assert()
        .success()
        .stdout(contains("[private photo withheld]").and(contains("Keeper at the gate").not()));
}

#[test]
fn test_export_and_import_csv() {
    let home = test_home("cli_csv");
    let db = init_journal(&home);
    let csv = out_path(&home, "sessions.csv");

    kl(&home)
        .args([
            "--db", &db, "session", "start", "--facility", "Taronga Zoo", "--date",
            "2024-03-01", "--at", "09:00",
        ])
        .assert()
        .success();
    kl(&home)
        .args([
            "--db", &db, "session", "complete", "--duration", "125", "--q1", "Fed koalas",
        ])
        .assert()
        .success();

    kl(&home)
        .args(["--db", &db, "export", "--format", "csv", "--file", &csv])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("Date,Facility,Supervisor,Role,Duration (mins)"));
    assert!(text.contains("2024-03-01,\"Taronga Zoo\",\"\",\"\",125,\"Fed koalas\""));

    // refuses to overwrite without --force
    kl(&home)
        .args(["--db", &db, "export", "--file", &csv])
        .write_stdin("n\n")
        .assert()
        .failure();

    kl(&home)
        .args(["--db", &db, "import", "--file", &csv])
        .assert()
        .success()
        .stdout(contains("Imported 1 session(s)"));

    kl(&home)
        .args(["--db", &db, "stats"])
        .assert()
        .success()
        .stdout(contains("2 session(s)").and(contains("4h 10m")));
}

#[test]
fn test_backup_and_restore() {
    let home = test_home("cli_backup");
    let db = init_journal(&home);
    let backup = out_path(&home, "backup.json");

    kl(&home)
        .args(["--db", &db, "competency", "add", "Reptile handling"])
        .assert()
        .success();

    kl(&home)
        .args(["--db", &db, "backup", "--file", &backup, "--compress"])
        .assert()
        .success()
        .stdout(contains("Backup created"));
    let zipped = out_path(&home, "backup.zip");
    assert!(fs::metadata(&zipped).is_ok());

    kl(&home)
        .args(["--db", &db, "clear", "--force"])
        .assert()
        .success();

    kl(&home)
        .args(["--db", &db, "restore", "--file", &zipped, "--force"])
        .assert()
        .success()
        .stdout(contains("11 competencies"));

    kl(&home)
        .args(["--db", &db, "competency", "list"])
        .assert()
        .success()
        .stdout(contains("Reptile handling"));
}

#[test]
fn test_restore_rejects_non_object_bundle() {
    let home = test_home("cli_bad_bundle");
    let db = init_journal(&home);
    let bad = out_path(&home, "bad.json");
    fs::write(&bad, "[1, 2, 3]").unwrap();

    kl(&home)
        .args(["--db", &db, "restore", "--file", &bad, "--force"])
        .assert()
        .failure()
        .stderr(contains("must be a JSON object"));
}

#[test]
fn test_competency_rating_and_duplicates() {
    let home = test_home("cli_competency");
    let db = init_journal(&home);

    kl(&home)
        .args(["--db", &db, "competency", "rate", "Safe handling and restraint", "4"])
        .assert()
        .success()
        .stdout(contains("set to 4/5"));

    kl(&home)
        .args(["--db", &db, "competency", "rate", "1", "9"])
        .assert()
        .failure();

    kl(&home)
        .args(["--db", &db, "competency", "add", "safe handling and restraint"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn test_profile_and_badges() {
    let home = test_home("cli_profile");
    let db = init_journal(&home);

    kl(&home)
        .args([
            "--db", &db, "profile", "--name", "Alex", "--target-hours", "120", "--facility",
            "Taronga Zoo",
        ])
        .assert()
        .success()
        .stdout(contains("Alex").and(contains("120")));

    // default facility from the profile
    kl(&home)
        .args(["--db", &db, "session", "start"])
        .assert()
        .success()
        .stdout(contains("started at Taronga Zoo"));

    kl(&home)
        .args(["--db", &db, "badges"])
        .assert()
        .success()
        .stdout(contains("Badges: 0/10 earned"));
}

#[test]
fn test_db_and_log_commands() {
    let home = test_home("cli_db");
    let db = init_journal(&home);

    kl(&home)
        .args(["--db", &db, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));

    kl(&home)
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"));
}
