use std::path::PathBuf;
use std::process::Command;

fn out_file(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("wot_cli_{}_{}.csv", name, std::process::id()));
    let _ = std::fs::remove_file(&p);
    p
}

fn scraper() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wot-wiki-scraper"))
}

#[test]
fn vehicles_with_countries_is_a_usage_error() {
    let out = out_file("countries");
    let output = scraper()
        .args(["-v", "Tiger II", "-c", "USA", "-f"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!out.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"), "{}", stderr);
}

#[test]
fn vehicles_with_types_is_a_usage_error() {
    let out = out_file("types");
    let status = scraper()
        .args(["--vehicles", "T-34", "--types", "Heavy", "--file"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!out.exists());
}

#[test]
fn unknown_layout_is_rejected() {
    let out = out_file("layout");
    let status = scraper()
        .args(["--layout", "retro", "-f"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!out.exists());
}

#[test]
fn unreachable_wiki_exits_non_zero_without_output() {
    let out = out_file("unreachable");
    let output = scraper()
        .args(["--wiki", "http://127.0.0.1:9/", "-q", "-f"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!out.exists());
}
