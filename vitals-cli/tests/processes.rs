use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::str::contains;

#[tokio::test]
async fn processes_command_lists_processes() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/processes")
                .query_param("sort", "memory")
                .query_param("n", "2");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"[{"pid":1234,"name":"postgres","cpu_percent":5.0,"memory_percent":22.5},
                        {"pid":99,"name":"redis","cpu_percent":1.0,"memory_percent":8.0}]"#,
                );
        })
        .await;

    Command::new(assert_cmd::cargo::cargo_bin!("vitals-cli"))
        .args(["--url", &server.base_url(), "processes", "--sort", "memory", "-n", "2"])
        .assert()
        .success()
        .stdout(contains("postgres"))
        .stdout(contains("1234"));

    m.assert_async().await;
}

#[tokio::test]
async fn processes_command_handles_empty_list() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/processes");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[]"#);
        })
        .await;

    Command::new(assert_cmd::cargo::cargo_bin!("vitals-cli"))
        .args(["--url", &server.base_url(), "processes"])
        .assert()
        .success()
        .stdout(contains("PID"));
}
