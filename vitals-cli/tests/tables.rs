use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::str::contains;

#[tokio::test]
async fn history_command_prints_rows() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/metrics/history")
                .query_param("points", "2");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"timestamps":["2024-05-01T10:00:00.000Z","2024-05-01T10:00:02.000Z"],
                        "cpu":[10.0,12.5],"memory":[40.0,41.0],"disk":[18.0,18.0],
                        "network":[0.0,0.0123]}"#,
                );
        })
        .await;

    Command::new(assert_cmd::cargo::cargo_bin!("vitals-cli"))
        .args(["--url", &server.base_url(), "history", "--points", "2"])
        .assert()
        .success()
        .stdout(contains("2024-05-01T10:00:02.000Z"))
        .stdout(contains("12.5"))
        .stdout(contains("0.0123"));

    m.assert_async().await;
}

#[tokio::test]
async fn empty_history_is_not_an_error() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/metrics/history");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"timestamps":[],"cpu":[],"memory":[],"disk":[],"network":[]}"#);
        })
        .await;

    Command::new(assert_cmd::cargo::cargo_bin!("vitals-cli"))
        .args(["--url", &server.base_url(), "history"])
        .assert()
        .success()
        .stdout(contains("no samples recorded yet"));
}

#[tokio::test]
async fn disk_command_prints_drives() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/disk");
            then.status(200)
                .header("content-type", "application/json")
                .body(
                    r#"{"drives":[{"mount":"/data","fstype":"xfs","percent":10.0,
                        "total_mb":9000.0,"used_mb":900.0,"free_mb":8100.0}]}"#,
                );
        })
        .await;

    Command::new(assert_cmd::cargo::cargo_bin!("vitals-cli"))
        .args(["--url", &server.base_url(), "--no-color", "disk"])
        .assert()
        .success()
        .stdout(contains("/data"))
        .stdout(contains("8100.00"));
}

#[tokio::test]
async fn network_command_prints_counters() {
    let server = MockServer::start_async().await;
    let _m = server
        .mock_async(|when, then| {
            when.method(GET).path("/network");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"eth0":{"bytes_sent":4096,"bytes_recv":8192}}"#);
        })
        .await;

    Command::new(assert_cmd::cargo::cargo_bin!("vitals-cli"))
        .args(["--url", &server.base_url(), "network"])
        .assert()
        .success()
        .stdout(contains("eth0"))
        .stdout(contains("8192"));
}
