//! Smoke tests for the monitoring-report binary.

use assert_cmd::Command;
use indoc::indoc;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("monitoring-report").unwrap();
    cmd.env_remove("MONITORING_REPORT_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn fields_lists_the_groundwater_vocabulary() {
    let stdout = stdout_of(bin().args(["fields", "--report", "qags"]));
    let lines: Vec<&str> = stdout.lines().collect();

    assert!(lines[0].starts_with("# qags field vocabulary"));
    assert!(lines.contains(&"tabela_qags_27"));
    assert!(lines.contains(&"parametros_escolhidos"));
}

#[test]
fn compile_writes_json_context_to_stdout() {
    let dir = TempDir::new().unwrap();
    let samples = dir.path().join("rows.json");
    fs::write(
        &samples,
        indoc! {r#"
            [
                {"Ponto": "S1", "Classe": "Nível 1", "Arsênio (mg/kg)": 3.0},
                {"Ponto": "S2", "Classe": "Nível 1", "Arsênio (mg/kg)": 9.0}
            ]
        "#},
    )
    .unwrap();

    let stdout = stdout_of(
        bin()
            .current_dir(dir.path())
            .arg("compile")
            .args(["--report", "qsd", "--format", "json"])
            .arg("--samples")
            .arg(&samples)
            .arg("--config")
            .arg(dir.path().join("absent.toml")),
    );
    let context: Value = serde_json::from_str(&stdout).unwrap();

    assert!(context.is_object());
    assert!(context.get("QSD_14").is_some());
}

#[test]
fn compile_writes_terminal_summary_to_file() {
    let dir = TempDir::new().unwrap();
    let samples = dir.path().join("rows.json");
    fs::write(&samples, r#"[{"Ponto": "P1", "Classe": "Classe 2", "pH": 7.1}]"#).unwrap();
    let output = dir.path().join("out/context.txt");

    bin()
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .args(["compile", "--report", "qag", "--format", "terminal"])
        .arg("--samples")
        .arg(&samples)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("REPORT CONTEXT (QAG)"));
}

#[test]
fn compile_rejects_missing_samples_file() {
    let dir = TempDir::new().unwrap();
    bin()
        .current_dir(dir.path())
        .args(["compile", "--report", "qsd", "--samples", "nope.json"])
        .assert()
        .failure();
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();

    bin().current_dir(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".monitoring-report.toml").exists());

    bin().current_dir(dir.path()).arg("init").assert().failure();
    bin()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn generate_reports_unknown_asset() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".monitoring-report.toml"),
        "[data]\nroot = \"data\"\n\n[storage]\nroot = \"out\"\n",
    )
    .unwrap();

    let output = bin()
        .current_dir(dir.path())
        .args([
            "generate",
            "--report",
            "qsd",
            "--asset-id",
            "missing",
            "--campaign-date",
            "2024-03-15",
            "--user-id",
            "u1",
            "--description",
            "x",
        ])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    let stderr = String::from_utf8(output).unwrap();
    assert!(stderr.contains("asset"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn generate_stores_and_registers_from_data_directory() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    let campaign_dir = data.join("campaigns/form_qualidade_de_sedimentos/a1");
    let config_dir = data.join("configurations/a1");
    fs::create_dir_all(data.join("assets")).unwrap();
    fs::create_dir_all(&campaign_dir).unwrap();
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(data.join("assets/a1.json"), r#"{"nome": "Porto Norte"}"#).unwrap();
    fs::write(config_dir.join("form_qualidade_de_sedimentos.json"), "{}").unwrap();
    fs::write(
        campaign_dir.join("2024-03-15.json"),
        indoc! {r#"
            {
                "campanha_de_coleta": "2024-03-15",
                "resultados": [{"Ponto": "S1", "Classe": "Nível 1", "Arsênio (mg/kg)": 3.0}]
            }
        "#},
    )
    .unwrap();

    let stdout = stdout_of(
        bin()
            .current_dir(dir.path())
            .env("NO_COLOR", "1")
            .args([
                "generate",
                "--report",
                "qsd",
                "--asset-id",
                "a1",
                "--campaign-date",
                "2024-03-15",
                "--user-id",
                "u1",
                "--description",
                "Campanha de março",
            ]),
    );

    assert!(stdout.contains("Relatório gerado e registrado com sucesso."));
    let registry = fs::read_to_string(dir.path().join("reports/registry.jsonl")).unwrap();
    let record: Value = serde_json::from_str(registry.lines().next().unwrap()).unwrap();
    assert_eq!(record["ativo_id"], "a1");
    assert_eq!(record["tipo_relatorio"], "qsd");
    assert!(dir.path().join("reports/relatorios-qsd/a1/2024-03-15").is_dir());
}
