use domain_rank::core::ConfigProvider;
use domain_rank::{LocalStorage, RankEngine, RankError, TomlConfig};
use httpmock::prelude::*;
use tempfile::TempDir;

fn page(domains: &[&str]) -> String {
    let groups: String = domains
        .iter()
        .map(|d| {
            format!(
                "<group><doc><url>https://{0}/</url><domain>{0}</domain></doc></group>",
                d
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><yandexsearch><response><results><grouping>{}</grouping></results></response></yandexsearch>",
        groups
    )
}

fn write_inputs(dir: &TempDir, domains: &str, queries: &str) {
    std::fs::write(dir.path().join("domains.txt"), domains).unwrap();
    std::fs::write(dir.path().join("queries.txt"), queries).unwrap();
}

fn config_for(server: &MockServer, top_domains: usize) -> TomlConfig {
    let toml_content = format!(
        r#"
[api]
key = "test-key"
folder_id = "test-folder"
endpoint = "{}"
retry_delay_ms = 1

[input]
domains = "domains.txt"
queries = "queries.txt"

[output]
path = "out/result.csv"

[search]
top_domains = {}

[runtime]
workers = 3
"#,
        server.url("/search/xml/"),
        top_domains
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

#[tokio::test]
async fn test_end_to_end_rank_report() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(&temp_dir, "a.com\nb.com\nz.com\n", "rust book\nasync rust\n");

    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/search/xml/")
            .query_param("folderid", "test-folder")
            .query_param("apikey", "test-key")
            .query_param("query", "rust book")
            .query_param("lr", "225")
            .query_param("page", "0");
        then.status(200)
            .body(page(&["a.com", "c.com", "a.com", "d.com", "b.com"]));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/search/xml/")
            .query_param("query", "async rust")
            .query_param("page", "0");
        then.status(200)
            .body(page(&["b.com", "e.com", "f.com", "g.com", "h.com"]));
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let engine = RankEngine::new(storage, config_for(&server, 5)).unwrap();

    let output_path = engine.run().await.unwrap();

    first.assert();
    second.assert();
    assert_eq!(output_path, "out/result.csv");

    let written = std::fs::read_to_string(temp_dir.path().join("out/result.csv")).unwrap();
    let mut reader = csv::Reader::from_reader(written.as_bytes());
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();

    assert_eq!(header, vec!["queries", "a.com", "b.com", "z.com"]);
    assert_eq!(rows[0], vec!["rust book", "1, 3", "5", "-"]);
    assert_eq!(rows[1], vec!["async rust", "-", "1", "-"]);
}

#[tokio::test]
async fn test_pagination_accumulates_positions_across_pages() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(&temp_dir, "b.com\ng.com\n", "query\n");

    let server = MockServer::start();
    let page0 = server.mock(|when, then| {
        when.method(GET).path("/search/xml/").query_param("page", "0");
        then.status(200).body(page(&["a.com", "b.com", "c.com"]));
    });
    let page1 = server.mock(|when, then| {
        when.method(GET).path("/search/xml/").query_param("page", "1");
        then.status(200).body(page(&["b.com", "e.com", "g.com"]));
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let engine = RankEngine::new(storage, config_for(&server, 6)).unwrap();

    engine.run().await.unwrap();

    page0.assert_hits(1);
    page1.assert_hits(1);
    let written = std::fs::read_to_string(temp_dir.path().join("out/result.csv")).unwrap();
    assert_eq!(written, "queries,b.com,g.com\nquery,\"2, 4\",6\n");
}

#[tokio::test]
async fn test_exhausted_results_fail_without_output() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(&temp_dir, "a.com\n", "query\n");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search/xml/").query_param("page", "0");
        then.status(200).body(page(&["a.com", "b.com"]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/search/xml/").query_param("page", "1");
        then.status(200).body(page(&[]));
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let engine = RankEngine::new(storage, config_for(&server, 10)).unwrap();

    let err = engine.run().await.unwrap_err();

    assert!(matches!(
        err,
        RankError::PrematureExhaustion {
            page: 1,
            collected: 2,
            requested: 10,
            ..
        }
    ));
    assert!(!temp_dir.path().join("out/result.csv").exists());
}

#[tokio::test]
async fn test_auth_failure_is_not_retried() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(&temp_dir, "a.com\n", "query\n");

    let server = MockServer::start();
    let denied = server.mock(|when, then| {
        when.method(GET).path("/search/xml/");
        then.status(403).body("<error>invalid key</error>");
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let config = config_for(&server, 10);
    assert_eq!(config.retry_attempts(), 5);
    let engine = RankEngine::new(storage, config).unwrap();

    let err = engine.run().await.unwrap_err();

    denied.assert_hits(1);
    assert!(matches!(err, RankError::HttpStatus { status: 403, .. }));
    assert!(!temp_dir.path().join("out/result.csv").exists());
}

#[tokio::test]
async fn test_missing_queries_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("domains.txt"), "a.com\n").unwrap();

    let server = MockServer::start();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let engine = RankEngine::new(storage, config_for(&server, 10)).unwrap();

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, RankError::IoError(_)));
}
