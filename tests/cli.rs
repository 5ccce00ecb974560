use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "staykeeper";

fn staykeeper(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("STAYKEEPER_DATA_DIR", data_dir.path())
        .env_remove("STAYKEEPER_ROLE")
        .env_remove("RUST_LOG");
    cmd
}

fn demo_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    staykeeper(&dir)
        .args(["init", "--demo"])
        .assert()
        .success()
        .stdout(contains("Demo data loaded"));
    dir
}

#[test]
fn init_creates_settings_file() {
    let dir = TempDir::new().unwrap();
    staykeeper(&dir).arg("init").assert().success();
    assert!(dir.path().join("config.json").exists());
}

#[test]
fn property_list_shows_demo_properties() {
    let dir = demo_dir();
    staykeeper(&dir)
        .args(["property", "list"])
        .assert()
        .success()
        .stdout(contains("Villa Serena").and(contains("Residence Belvedere")));
}

#[test]
fn overlapping_booking_is_rejected() {
    let dir = demo_dir();

    // Camera Deluxe is booked 2024-08-01 -> 2024-08-07; the boundary day collides
    staykeeper(&dir)
        .args([
            "booking",
            "create",
            "Camera Deluxe",
            "Giulia Bianchi",
            "--start",
            "2024-08-07",
            "--end",
            "2024-08-09",
            "--price",
            "160",
        ])
        .assert()
        .failure()
        .stderr(contains("Booking conflict"));

    staykeeper(&dir)
        .args([
            "booking",
            "create",
            "Camera Deluxe",
            "Giulia Bianchi",
            "--start",
            "2024-08-08",
            "--end",
            "2024-08-09",
            "--price",
            "80",
        ])
        .assert()
        .success()
        .stdout(contains("1 nights"));
}

#[test]
fn booking_check_reports_availability() {
    let dir = demo_dir();
    staykeeper(&dir)
        .args(["booking", "check", "Suite Premium", "2024-08-15", "2024-08-20"])
        .assert()
        .success()
        .stdout(contains("NOT available"));
    staykeeper(&dir)
        .args(["booking", "check", "Suite Premium", "2024-08-18", "2024-08-20"])
        .assert()
        .success()
        .stdout(contains("is available"));
}

#[test]
fn expense_generation_runs_once_per_month() {
    let dir = demo_dir();

    staykeeper(&dir)
        .args(["expense", "generate", "--as-of", "2024-08-01"])
        .assert()
        .success()
        .stdout(contains("Created 3 expense(s)"));

    staykeeper(&dir)
        .args(["expense", "generate", "--as-of", "2024-08-20"])
        .assert()
        .success()
        .stdout(contains("Created 0 expense(s), 3 already recorded this month"));

    staykeeper(&dir)
        .args(["expense", "list", "--period", "2024-08"])
        .assert()
        .success()
        .stdout(contains("[Auto] Affitto").and(contains("[Auto] Condominio")));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = demo_dir();

    staykeeper(&dir)
        .args(["expense", "generate", "--as-of", "2024-08-01", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("Would create 3 expense(s)"));

    staykeeper(&dir)
        .args(["expense", "list", "--period", "2024-08"])
        .assert()
        .success()
        .stdout(contains("No expenses found."));
}

#[test]
fn viewer_cannot_mutate() {
    let dir = demo_dir();

    staykeeper(&dir)
        .args(["--role", "viewer", "property", "create", "Casa Nuova"])
        .assert()
        .failure()
        .stderr(contains("Not authorized"));

    staykeeper(&dir)
        .env("STAYKEEPER_ROLE", "viewer")
        .args(["expense", "generate", "--as-of", "2024-08-01"])
        .assert()
        .failure()
        .stderr(contains("Not authorized"));

    staykeeper(&dir)
        .args(["--role", "viewer", "booking", "list"])
        .assert()
        .success();
}

#[test]
fn redirected_logs_have_no_colour_codes() {
    let dir = demo_dir();

    staykeeper(&dir)
        .args(["--role", "viewer", "property", "create", "Casa Nuova"])
        .assert()
        .failure()
        .stderr(contains("authorization denied").and(contains("\u{1b}[").not()));
}

#[test]
fn staff_cannot_view_audit_log() {
    let dir = demo_dir();
    staykeeper(&dir).arg("audit").assert().failure();
    staykeeper(&dir)
        .args(["--role", "admin", "audit"])
        .assert()
        .success();
}

#[test]
fn profit_and_loss_report() {
    let dir = demo_dir();
    staykeeper(&dir)
        .args(["expense", "generate", "--as-of", "2024-08-01"])
        .assert()
        .success();

    // Villa Serena, August 2024: 560 + 840 revenue, 1500 + 100 generated costs
    staykeeper(&dir)
        .args(["report", "pl", "Villa Serena", "--month", "2024-08"])
        .assert()
        .success()
        .stdout(
            contains("€1400.00")
                .and(contains("€1600.00"))
                .and(contains("-€200.00")),
        );
}

#[test]
fn export_writes_files() {
    let dir = demo_dir();
    let out = TempDir::new().unwrap();
    let json = out.path().join("export.json");
    let bookings = out.path().join("bookings.csv");

    staykeeper(&dir)
        .args(["export", "json"])
        .arg(&json)
        .assert()
        .success();
    staykeeper(&dir)
        .args(["export", "bookings"])
        .arg(&bookings)
        .assert()
        .success()
        .stdout(contains("Exported 5 bookings"));

    let contents = std::fs::read_to_string(json).unwrap();
    assert!(contents.contains("\"schema_version\":\"1.0.0\""));
}

#[test]
fn invalid_role_is_an_error() {
    let dir = TempDir::new().unwrap();
    staykeeper(&dir)
        .args(["--role", "owner", "property", "list"])
        .assert()
        .failure()
        .stderr(contains("Invalid role"));
}

#[test]
fn profit_loss_rejects_out_of_range_year() {
    let dir = demo_dir();

    staykeeper(&dir)
        .args(["report", "pl", "Villa Serena", "--year", "300000"])
        .assert()
        .failure()
        .stderr(contains("outside the supported date range"));
}
