use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_adf") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("adf{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_adf is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn testdata_path(path: &str) -> PathBuf {
    repo_root().join(path)
}

fn write_file(dir: &TempDir, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("temporary file should be created");
    path
}

fn run_adf(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("adf should execute")
}

fn run_validate(input: &Path, extra: &[&str]) -> Output {
    let input = input.to_string_lossy();
    let mut args = vec!["validate", input.as_ref()];
    args.extend_from_slice(extra);
    run_adf(&args)
}

fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

const MINIMAL_LEAD: &str = r#"{"adf": {"prospect": {
    "vehicle": {"year": "2023", "make": "Hyundai", "model": "i30"},
    "customer": {"contact": {"name": "John B"}}
}}}"#;

#[test]
fn validate_prints_normalized_full_lead() {
    let input = testdata_path("testdata/leads/full_lead.json");
    let output = run_validate(&input, &[]);

    assert_exit_code(&output, 0);

    let expected: Value =
        serde_json::from_str(&fs::read_to_string(&input).unwrap()).unwrap();
    assert_eq!(stdout_json(&output), expected);
    assert!(output.stderr.is_empty(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn validate_accepts_xml_input() {
    let input = testdata_path("testdata/leads/full_lead.xml");
    let output = run_validate(&input, &[]);

    assert_exit_code(&output, 0);

    let expected: Value = serde_json::from_str(
        &fs::read_to_string(testdata_path("testdata/leads/full_lead.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(stdout_json(&output), expected);
}

#[test]
fn validate_forced_format_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(&dir, "xml-in-txt.txt", "<adf><prospect status=\"new\"/></adf>");
    let output = run_validate(&lead, &["--format", "xml"]);

    assert_exit_code(&output, 0);
    assert_eq!(stdout_json(&output)["adf"]["prospect"]["@status"], "new");
}

#[test]
fn validate_returns_validation_exit_code_for_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(
        &dir,
        "missing-model.json",
        r#"{"adf": {"prospect": {"vehicle": {"year": "2023", "make": "Hyundai"}}}}"#,
    );
    let output = run_validate(&lead, &[]);

    assert_exit_code(&output, 1);
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(
        "adf.prospect.vehicle: The following required fields in Vehicle are missing: model"
    ));
}

#[test]
fn validate_lists_every_error() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(
        &dir,
        "several-errors.json",
        r##"{"adf": {"prospect": {
            "@status": "old",
            "vehicle": {"year": "2023", "make": "Kia", "model": "Rio",
                        "price": {"@currency": "US", "#text": 1}},
            "customer": {"contact": {"name": "Ann",
                         "address": {"street": "1 Main", "country": "Atlantis"}}}
        }}}"##,
    );
    let output = run_validate(&lead, &[]);

    assert_exit_code(&output, 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 3, "{stderr}");
    assert!(stderr.contains("adf.prospect.status:"));
    assert!(stderr.contains("adf.prospect.vehicle.price.currency:"));
    assert!(stderr.contains("adf.prospect.customer.contact.address.country:"));
}

#[test]
fn validate_max_errors_truncates_report() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(
        &dir,
        "capped.json",
        r#"{"adf": {"prospect": {
            "@status": "old",
            "requestdate": "yesterday",
            "vehicle": {"@interest": "rent", "@status": "broken"}
        }}}"#,
    );
    let output = run_validate(&lead, &["--max-errors", "1"]);

    assert_exit_code(&output, 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.lines().count(), 2, "{stderr}");
    assert!(stderr.contains("... further errors suppressed"));
}

#[test]
fn validate_unknown_keys_follow_strictness() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(
        &dir,
        "unknown-key.json",
        r#"{"adf": {"prospect": {"vehicle": {"year": "2023", "make": "Kia", "model": "Rio", "colour": "red"}}}}"#,
    );

    let output = run_validate(&lead, &[]);
    assert_exit_code(&output, 0);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: adf.prospect.vehicle.colour: Unknown field 'colour' in Vehicle"));
    assert!(stdout_json(&output)["adf"]["prospect"]["vehicle"].get("colour").is_none());

    let output = run_validate(&lead, &["--strictness", "strict"]);
    assert_exit_code(&output, 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown field 'colour'"));

    let output = run_validate(&lead, &["-s", "lenient"]);
    assert_exit_code(&output, 0);
    assert!(output.stderr.is_empty());
}

#[test]
fn validate_field_keys_and_nulls() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(&dir, "field-keys.json", MINIMAL_LEAD);
    let output = run_validate(&lead, &["--keys", "field", "--emit-nulls"]);

    assert_exit_code(&output, 0);

    let value = stdout_json(&output);
    let prospect = &value["adf"]["prospect"];
    assert!(prospect["request_date"].is_null());
    assert_eq!(prospect["vehicle"]["make"], "Hyundai");
    assert!(prospect["vehicle"]["vin"].is_null());
}

#[test]
fn validate_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(&dir, "to-file.json", MINIMAL_LEAD);
    let destination = dir.path().join("normalized.json");
    let destination_arg = destination.to_string_lossy().into_owned();
    let output = run_validate(&lead, &["--output", &destination_arg]);

    assert_exit_code(&output, 0);
    assert!(output.stdout.is_empty());

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&destination).unwrap()).unwrap();
    let expected: Value = serde_json::from_str(MINIMAL_LEAD).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn validate_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(
        &dir,
        "json-report.json",
        r##"{"adf": {"prospect": {"vehicle": {"year": "2023", "make": "Kia", "model": "Rio",
            "price": {"@currency": "usd", "#text": 1}}}}}"##,
    );
    let output = run_validate(&lead, &["--report", "json"]);

    assert_exit_code(&output, 1);

    let report: Value = serde_json::from_slice(&output.stderr).expect("report should be JSON");
    assert_eq!(report["valid"], false);
    assert_eq!(report["error_count"], 1);
    assert_eq!(report["issues"][0]["code"], "INVALID_CURRENCY");
    assert_eq!(report["issues"][0]["path"], "adf.prospect.vehicle.price.currency");
}

#[test]
fn validate_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(
        &dir,
        "config-strict.json",
        r#"{"adf": {"prospect": {"vehicle": {"year": "2023", "make": "Kia", "model": "Rio", "colour": "red"}}}}"#,
    );
    let config = write_file(&dir, "config.yaml", "strictness: strict\npretty: false\n");
    let config_arg = config.to_string_lossy().into_owned();

    let output = run_validate(&lead, &["--config", &config_arg]);
    assert_exit_code(&output, 1);

    let output = run_validate(&lead, &["--config", &config_arg, "--strictness", "moderate"]);
    assert_exit_code(&output, 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "compact output expected: {stdout}");
}

#[test]
fn validate_returns_io_exit_code_for_missing_file() {
    let missing = testdata_path("testdata/leads/does-not-exist.json");
    let output = run_validate(&missing, &[]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
}

#[test]
fn validate_returns_io_exit_code_for_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(&dir, "broken.json", "{\"adf\": {\"prospect\": ");
    let output = run_validate(&lead, &[]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid JSON format"));
}

#[test]
fn validate_non_utf8_input_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(
        &dir,
        "latin1.json",
        b"{\"adf\": {\"prospect\": {\"comments\": \"Jos\xe9\"}}}",
    );
    let output = run_validate(&lead, &[]);

    assert_exit_code(&output, 2);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid JSON format"), "{stderr}");
    assert!(stderr.contains("invalid UTF-8"), "{stderr}");
}

#[test]
fn validate_returns_io_exit_code_for_malformed_xml() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(&dir, "broken.xml", "<adf><prospect></adf>");
    let output = run_validate(&lead, &[]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid XML format"));
}

#[test]
fn validate_returns_io_exit_code_for_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let lead = write_file(&dir, "no-config.json", MINIMAL_LEAD);
    let output = run_validate(&lead, &["--config", "/nonexistent/adf.yaml"]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load configuration"));
}
