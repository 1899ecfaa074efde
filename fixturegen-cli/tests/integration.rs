use std::io::Write;
use std::process::{Command, Output};

fn fixturegen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fixturegen"))
        .args(args)
        .env_remove("FIXTUREGEN_SEED")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_cli_help() {
    let output = fixturegen(&["--help"]);

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("value"));
    assert!(stdout.contains("table"));
    assert!(stdout.contains("classes"));
}

#[test]
fn test_cli_value_help() {
    let output = fixturegen(&["value", "--help"]);

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--type"));
    assert!(stdout.contains("--unique"));
    assert!(stdout.contains("--seed"));
    assert!(stdout.contains("FIXTUREGEN_SEED"));
}

#[test]
fn test_cli_alpha_values() {
    let output = fixturegen(&["value", "-t", "ALPHA", "--min", "5", "--max", "5", "-n", "4", "-s", "11"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines
        .iter()
        .all(|line| line.len() == 5 && line.chars().all(|c| c.is_ascii_alphabetic())));
}

#[test]
fn test_cli_seed_from_environment() {
    let run = || {
        Command::new(env!("CARGO_BIN_EXE_fixturegen"))
            .args(["value", "-t", "integer", "--max", "1000000", "-n", "3"])
            .env("FIXTUREGEN_SEED", "2014")
            .output()
            .expect("Failed to execute command")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_cli_price_json() {
    let output = fixturegen(&[
        "value", "-t", "price", "--min", "10", "--max", "20", "-n", "5", "-f", "json", "-s", "3",
    ]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let prices = json.as_array().unwrap();
    assert_eq!(prices.len(), 5);
    for price in prices {
        let price = price.as_f64().unwrap();
        assert!((10.0..=20.0).contains(&price));
    }
}

#[test]
fn test_cli_unsupported_type_fails() {
    let output = fixturegen(&["value", "-t", "NOT_A_TYPE"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Unsupported value type 'NOT_A_TYPE'"));
}

#[test]
fn test_cli_table_rows() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "type_name": "User",
            "fields": {{
                "login": {{"type": "ALPHA", "constraints": {{"min": 6, "max": 6, "lowercase": true, "unique": "login"}}}},
                "email": {{"type": "EMAIL"}},
                "age": {{"type": "INTEGER", "constraints": {{"min": 18, "max": 99}}}}
            }},
            "required": ["login"]
        }}"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let output = fixturegen(&["table", path, "-n", "3", "-f", "json", "-s", "8"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_eq!(row["login"].as_str().map(str::len), Some(6));
        assert!(row["email"].as_str().unwrap().contains('@'));
        let age = row["age"].as_i64().unwrap();
        assert!((18..=99).contains(&age));
    }
}

#[test]
fn test_cli_table_missing_file() {
    let output = fixturegen(&["table", "/nonexistent/table.json"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("reading field table"));
}

#[test]
fn test_cli_classes() {
    let output = fixturegen(&["classes"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("ALPHA"));
    assert!(stdout.contains("NUMERIC"));
}
