use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CUSTOMER_ID: &str = "3f0c2d4e-8a9b-4c1d-9e2f-123456789abc";

/// Builds a command isolated from the caller's environment and config files.
fn agentlens_command(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_agentlens"));
    cmd.env_clear()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .current_dir(home);
    cmd
}

fn with_services(cmd: &mut Command, uri: &str) {
    cmd.env("SUPABASE_URL", uri)
        .env("SUPABASE_SERVICE_ROLE_KEY", "service-role-key")
        .env("VAPI_PRIVATE_KEY", "vapi-private-key")
        .env("VAPI_BASE_URL", uri);
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("Failed to execute agentlens");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

async fn run_async(cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || {
        let mut cmd = cmd;
        cmd.output().expect("Failed to execute agentlens")
    })
    .await
    .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod arguments {
    use super::*;

    #[test]
    fn test_help_describes_usage() {
        let home = TempDir::new().unwrap();
        let output = agentlens_command(home.path()).arg("--help").output().unwrap();

        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("CUSTOMER_ID"));
        assert!(out.contains("--verbose"));
        assert!(out.contains("--config"));
    }

    #[test]
    fn test_version() {
        let home = TempDir::new().unwrap();
        let output = agentlens_command(home.path())
            .arg("--version")
            .output()
            .unwrap();

        assert!(output.status.success());
        assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
    }
}

mod prompting {
    use super::*;

    #[test]
    fn test_blank_input_exits_cleanly() {
        let home = TempDir::new().unwrap();
        let mut cmd = agentlens_command(home.path());
        with_services(&mut cmd, "http://127.0.0.1:1");

        let output = run_with_stdin(cmd, "   \n");

        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("Enter the Customer ID (UUID) to check:"));
        assert!(out.contains("No ID entered. Exiting."));
    }

    #[test]
    fn test_rust_log_filters_do_not_break_startup() {
        for filter in ["off", "agentlens_core", "info,hyper"] {
            let home = TempDir::new().unwrap();
            let mut cmd = agentlens_command(home.path());
            with_services(&mut cmd, "http://127.0.0.1:1");
            cmd.env("RUST_LOG", filter);

            let output = run_with_stdin(cmd, "\n");

            assert!(
                output.status.success(),
                "RUST_LOG={} stderr: {}",
                filter,
                stderr(&output)
            );
            assert!(stdout(&output).contains("No ID entered. Exiting."));
        }
    }

    #[test]
    fn test_missing_credentials_fail_before_prompting() {
        let home = TempDir::new().unwrap();
        let output = run_with_stdin(agentlens_command(home.path()), "abc\n");

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Error:"));
        assert!(!stdout(&output).contains("Searching for Customer ID"));
    }
}

mod config_file {
    use super::*;

    #[test]
    fn test_invalid_table_name_is_rejected() {
        let home = TempDir::new().unwrap();
        let config_path = home.path().join("extra.toml");
        std::fs::write(&config_path, "[store]\ntable = \"customers; drop\"\n").unwrap();

        let mut cmd = agentlens_command(home.path());
        with_services(&mut cmd, "http://127.0.0.1:1");
        let output = cmd.arg("--config").arg(&config_path).arg("abc").output().unwrap();

        assert!(!output.status.success());
        assert!(stderr(&output).contains("store.table"));
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        let home = TempDir::new().unwrap();
        let mut cmd = agentlens_command(home.path());
        with_services(&mut cmd, "http://127.0.0.1:1");
        let output = cmd
            .args(["--config", "does-not-exist.toml", "abc"])
            .output()
            .unwrap();

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Error:"));
    }
}

mod end_to_end {
    use super::*;

    async fn mount_customer(server: &MockServer, agents: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/customers"))
            .and(query_param("select", "agents"))
            .and(query_param("id", format!("eq.{}", CUSTOMER_ID)))
            .and(header("apikey", "service-role-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(agents))
            .mount(server)
            .await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_prints_linked_assistants() {
        let server = MockServer::start().await;
        mount_customer(&server, json!([{ "agents": "x1; x2" }])).await;
        Mock::given(method("GET"))
            .and(path("/assistant/x1"))
            .and(header("authorization", "Bearer vapi-private-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Bot",
                "model": { "model": "gpt-4" },
                "firstMessage": "Hello there, welcome!"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/assistant/x2"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{\"message\":\"Not Found\"}"))
            .mount(&server)
            .await;

        let home = TempDir::new().unwrap();
        let mut cmd = agentlens_command(home.path());
        with_services(&mut cmd, &server.uri());
        cmd.arg(CUSTOMER_ID);

        let output = run_async(cmd).await;
        let out = stdout(&output);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(out.contains(&format!("Searching for Customer ID: {}", CUSTOMER_ID)));
        assert!(out.contains("Found 2 assistant(s) linked to this customer."));
        assert!(out.contains("Fetching Vapi config for: x1 ..."));
        assert!(out.contains("Name: Bot"));
        assert!(out.contains("Model: gpt-4"));
        assert!(out.contains("First Message: Hello there, welcome!..."));
        assert!(out.contains("Failed to fetch Vapi config (Status 404)"));
        assert!(out.contains(&"-".repeat(40)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_customer_exits_zero() {
        let server = MockServer::start().await;
        mount_customer(&server, json!([])).await;

        let home = TempDir::new().unwrap();
        let mut cmd = agentlens_command(home.path());
        with_services(&mut cmd, &server.uri());
        cmd.arg(CUSTOMER_ID);

        let output = run_async(cmd).await;

        assert!(output.status.success());
        assert!(stdout(&output).contains("No customer found with ID"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_store_rejection_is_reported_and_exits_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/customers"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let home = TempDir::new().unwrap();
        let mut cmd = agentlens_command(home.path());
        with_services(&mut cmd, &server.uri());
        cmd.arg(CUSTOMER_ID);

        let output = run_async(cmd).await;

        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("Error fetching from data store"));
        assert!(!out.contains("Fetching Vapi config"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_prompted_id_is_used() {
        let server = MockServer::start().await;
        mount_customer(&server, json!([{ "agents": "" }])).await;

        let home = TempDir::new().unwrap();
        let mut cmd = agentlens_command(home.path());
        with_services(&mut cmd, &server.uri());

        let input = format!("  {}  \n", CUSTOMER_ID);
        let output = tokio::task::spawn_blocking(move || run_with_stdin(cmd, &input))
            .await
            .unwrap();

        assert!(output.status.success());
        assert!(stdout(&output).contains("'agents' column is empty"));
    }
}
