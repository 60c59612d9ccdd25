use crate::log_capture::CapturedLogs;
use page_tally::config::{parse_config, Config};
use page_tally::crawler::{run_scan, spawn_dispatcher, Dispatcher, Fetcher, Task};
use page_tally::output::CollectingReporter;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a 200 page with the given body
async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_mixed_input_scenario() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/p1", "Go is great, Go is fun").await;
    mount_page(&mock_server, "/p2", "no match here").await;

    let input = format!("{base}/p1\nnot a url\n{base}/p2\n", base = base_url);
    let reporter = Arc::new(CollectingReporter::new());
    let (logs, _guard) = CapturedLogs::install();

    let aggregate = run_scan(&Config::default(), input.as_bytes(), reporter.clone())
        .await
        .expect("Scan failed");

    assert_eq!(aggregate.total, 2);
    assert_eq!(aggregate.tasks_dispatched, 2);
    assert_eq!(aggregate.pages_counted, 2);

    let lines = reporter.lines();
    assert_eq!(lines.len(), 3);
    // Per-page lines arrive in completion order, the total is always last
    assert!(lines.contains(&format!("Count for {}/p1: 2", base_url)));
    assert!(lines.contains(&format!("Count for {}/p2: 0", base_url)));
    assert_eq!(lines.last().map(String::as_str), Some("Total: 2"));

    // The invalid line is skipped with exactly one diagnostic, and no fetch failed
    assert_eq!(logs.count_containing("[not a url] "), 1);
    assert_eq!(logs.count_containing(&format!("[{}/", base_url)), 0);
}

#[tokio::test]
async fn test_timed_out_fetch_contributes_zero() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/fast", "Go Go Go").await;
    Mock::given(method("GET"))
        .and(path("/stalled"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Go Go Go Go Go")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = parse_config("[fetcher]\nrequest-timeout-secs = 1\n").expect("Invalid config");
    let input = format!("{base}/stalled\n{base}/fast\n", base = base_url);
    let reporter = Arc::new(CollectingReporter::new());
    let (logs, _guard) = CapturedLogs::install();

    let aggregate = tokio::time::timeout(
        Duration::from_secs(10),
        run_scan(&config, input.as_bytes(), reporter.clone()),
    )
    .await
    .expect("Scan hung on a timed out fetch")
    .expect("Scan failed");

    assert_eq!(aggregate.total, 3);
    assert_eq!(aggregate.failed(), 1);
    assert_eq!(
        reporter.lines(),
        vec![format!("Count for {}/fast: 3", base_url), "Total: 3".to_string()]
    );

    let stalled = format!("[{}/stalled] request timed out", base_url);
    assert_eq!(logs.count_containing(&stalled), 1);
    assert_eq!(logs.count_containing("transport=true"), 1);
    assert_eq!(logs.count_containing(&format!("[{}/fast]", base_url)), 0);
}

#[tokio::test]
async fn test_http_errors_are_excluded_from_total() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/ok", "Go").await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Go Go Go"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Go"))
        .mount(&mock_server)
        .await;

    let input = format!("{b}/ok\n{b}/error\n{b}/moved\n", b = base_url);
    let reporter = Arc::new(CollectingReporter::new());
    let (logs, _guard) = CapturedLogs::install();

    let aggregate = run_scan(&Config::default(), input.as_bytes(), reporter.clone())
        .await
        .expect("Scan failed");

    assert_eq!(aggregate.total, 1);
    assert_eq!(aggregate.pages_counted, 1);
    assert_eq!(aggregate.failed(), 2);

    // One diagnostic per failed fetch, carrying the status code
    assert_eq!(
        logs.count_containing(&format!("[{}/error] Wrong http response code=500", base_url)),
        1
    );
    assert_eq!(
        logs.count_containing(&format!("[{}/moved] Wrong http response code=403", base_url)),
        1
    );
}

#[tokio::test]
async fn test_custom_pattern_from_config() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/doc", "aaaa aa Go").await;

    let config = parse_config("[search]\npattern = \"aa\"\n").expect("Invalid config");
    let reporter = Arc::new(CollectingReporter::new());

    let aggregate = run_scan(&config, format!("{}/doc\n", base_url).as_bytes(), reporter)
        .await
        .expect("Scan failed");

    assert_eq!(aggregate.total, 3);
}

#[tokio::test]
async fn test_total_matches_sum_of_page_counts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let bodies = [
        ("/one", "Go"),
        ("/two", "GoGo"),
        ("/three", "Go Go Go go"),
        ("/none", "golang"),
    ];
    for (page, body) in bodies {
        mount_page(&mock_server, page, body).await;
    }

    let input: String = bodies
        .iter()
        .map(|(page, _)| format!("{}{}\n", base_url, page))
        .collect();

    let config = parse_config("[dispatcher]\ninput-capacity = 1\nmax-workers = 2\n")
        .expect("Invalid config");
    let reporter = Arc::new(CollectingReporter::new());

    let aggregate = run_scan(&config, input.as_bytes(), reporter.clone())
        .await
        .expect("Scan failed");

    let summed: usize = reporter
        .lines()
        .iter()
        .filter_map(|line| line.strip_prefix("Count for "))
        .filter_map(|rest| rest.rsplit(": ").next())
        .map(|n| n.parse::<usize>().expect("count is numeric"))
        .sum();

    assert_eq!(aggregate.total, 6);
    assert_eq!(summed, aggregate.total);
}

#[tokio::test]
async fn test_single_aggregate_after_all_workers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Staggered delays so completion order differs from submission order
    for (i, delay) in [250u64, 10, 150, 0, 80].iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(format!("/page{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Go")
                    .set_delay(Duration::from_millis(*delay)),
            )
            .mount(&mock_server)
            .await;
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build client");
    let reporter = Arc::new(CollectingReporter::new());
    let dispatcher = Dispatcher::new(Arc::new(Fetcher::new(client)), "Go", reporter.clone());
    let (tasks, handle) = spawn_dispatcher(dispatcher, 2);

    for i in 0..5 {
        let task = Task::parse(&format!("{}/page{}", base_url, i)).expect("valid URL");
        tasks.send(task).await.expect("Dispatcher closed early");
    }
    drop(tasks);

    let aggregate = handle.await.expect("Dispatcher panicked");

    assert_eq!(aggregate.total, 5);
    assert_eq!(aggregate.tasks_dispatched, 5);
    // Every worker had reported before the aggregate was delivered
    assert_eq!(reporter.lines().len(), 5);
}
