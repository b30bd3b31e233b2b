use assert_cmd::Command;
use headshot_core::auth::jwt::verify_access_token;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("headshot-cli").unwrap()
}

#[test]
fn version_prints_package_version() {
    cli()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn styles_lists_all_thirteen() {
    let output = cli().arg("styles").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.lines().count(), 13);
    assert!(text.contains("environmental"));
}

#[test]
fn styles_marks_tier_allowlist() {
    cli()
        .args(["styles", "--tier", "free"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* casual"))
        .stdout(predicate::str::contains("  executive"))
        .stdout(predicate::str::contains("4 images per request, 5 credits per month"));
}

#[test]
fn unknown_tier_fails() {
    cli()
        .args(["styles", "--tier", "gold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tier"));
}

#[test]
fn mint_token_is_verifiable() {
    let output = cli()
        .env_remove("JWT_SECRET")
        .args(["mint-token", "--user-id", "u1", "--email", "u1@example.com", "--secret", "s3cret"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let token = String::from_utf8(output).unwrap();
    let claims = verify_access_token(token.trim(), b"s3cret").expect("valid token");
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.email, "u1@example.com");
}

#[test]
fn mint_token_rejects_blank_user() {
    cli()
        .args(["mint-token", "--user-id", " ", "--secret", "s3cret"])
        .assert()
        .failure();
}
