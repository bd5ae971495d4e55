//! E2E tests for the compute, variables, schema and validate commands

use std::process::Command;

fn fisco(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Monthly variables for January, with the test parameters
#[test]
fn compute_monthly_variables() {
    let output = fisco(&[
        "compute",
        "-s",
        "tests/data/situation.json",
        "-p",
        "tests/data/parameters.json",
        "-P",
        "2024-01",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("income_tax"));
    assert!(stdout.contains("social_security_contribution"));
    // Yearly variables are not computed for a month
    assert!(!stdout.contains("housing_tax"));

    // 2000 * 0.2 + 15000 * 0.2
    assert!(stdout.contains("TOTAL income_tax: 3400"));
    // 2000 * 0.02 + (12000 * 0.02 + 3000 * 0.12)
    assert!(stdout.contains("TOTAL social_security_contribution: 640"));
}

/// Housing tax reads January even when the situation changes mid-year
#[test]
fn compute_housing_tax_csv() {
    let output = fisco(&[
        "compute",
        "-s",
        "tests/data/situation.json",
        "-p",
        "tests/data/parameters.json",
        "-P",
        "2024",
        "-v",
        "housing_tax",
        "--csv",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("variable,entity,id,period,value"));
    assert!(stdout.contains("housing_tax,household,bianchi,2024,0"));
    assert!(stdout.contains("housing_tax,household,rossi,2024,800"));
}

/// IRPEF stays the flat product of gross income and the bracket rate
#[test]
fn compute_irpef_json() {
    let output = fisco(&[
        "compute",
        "-s",
        "tests/data/situation.json",
        "-p",
        "tests/data/parameters.json",
        "-P",
        "2024",
        "-v",
        "irpef",
        "--json",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["period"], "2024");
    let results = json["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], "anna");
    let anna: f64 = results[0]["value"].as_str().unwrap().parse().unwrap();
    assert_eq!(anna, 6900.0);
}

/// Asking for a monthly variable over a year fails
#[test]
fn compute_rejects_wrong_granularity() {
    let output = fisco(&[
        "compute",
        "-s",
        "tests/data/situation.json",
        "-P",
        "2024",
        "-v",
        "income_tax",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("income_tax"));
}

/// Missing inputs surface as errors
#[test]
fn compute_reports_missing_input() {
    let output = fisco(&[
        "compute",
        "-s",
        "tests/data/situation.json",
        "-P",
        "2024-02",
        "-v",
        "income_tax",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("annual_dependent_employment_income"));
}

#[test]
fn variables_lists_all_variables() {
    let output = fisco(&["variables"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    for name in ["income_tax", "social_security_contribution", "housing_tax", "irpef"] {
        assert!(stdout.contains(name), "missing {name}");
    }
    assert!(stdout.contains("tasse.contributo_sicurezza_sociale (scale)"));
}

#[test]
fn schema_fields() {
    let output = fisco(&["schema", "fields"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("persons.<id>"));
    assert!(stdout.contains("housing_occupancy_status"));
}

#[test]
fn schema_json() {
    let output = fisco(&["schema"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(json["properties"]["persons"].is_object());
    assert!(json["properties"]["households"].is_object());
}

#[test]
fn validate_builtin_parameters() {
    let output = fisco(&["validate", "-P", "2024"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found"));
}

#[test]
fn validate_incomplete_parameters() {
    let output = fisco(&[
        "validate",
        "-p",
        "tests/data/incomplete_parameters.json",
        "-P",
        "2024",
        "--json",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    // Six months of income_tax, twelve of the contribution, plus irpef
    assert_eq!(json["issue_count"], 19);
}
