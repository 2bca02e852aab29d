// tests/github_test.rs
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use release_range::config::GitHubConfig;
use release_range::git::{GitHubRepository, Repository, RepositoryDescriptor};
use release_range::ReleaseRangeError;
use serde_json::json;

/// Serves the canned responses in order, one connection each, and returns
/// the requests it saw as `"<request line>\n<body>"`.
fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();
            seen.push(format!(
                "{}\n{}",
                request_line.trim_end(),
                String::from_utf8(request_body).unwrap()
            ));

            let reason = if status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            // The client may hang up on an error status before reading the body
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
        seen
    });

    (base_url, handle)
}

fn client(base_url: &str, per_page: u32) -> GitHubRepository {
    let agent: ureq::Agent = ureq::Agent::config_builder().proxy(None).build().into();

    GitHubRepository::new(
        RepositoryDescriptor::new("grafana", "loki", "main"),
        "super-secret-token".to_string(),
        GitHubConfig {
            api_url: base_url.to_string(),
            graphql_url: format!("{}/graphql", base_url),
            per_page,
        },
    )
    .with_agent(agent)
}

fn tags_page(names: &[(&str, &str)]) -> (u16, String) {
    let tags: Vec<_> = names
        .iter()
        .map(|(name, sha)| json!({ "name": name, "commit": { "sha": sha } }))
        .collect();
    (200, json!(tags).to_string())
}

fn history_page(shas: &[&str], end_cursor: Option<&str>, has_next_page: bool) -> (u16, String) {
    let nodes: Vec<_> = shas
        .iter()
        .map(|sha| json!({ "oid": sha, "message": format!("fix: {}", sha) }))
        .collect();
    let body = json!({
        "data": { "repository": { "ref": { "target": { "history": {
            "nodes": nodes,
            "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor }
        } } } } }
    });
    (200, body.to_string())
}

#[test]
fn test_list_tags_stops_on_short_page() {
    let (base_url, server) = serve(vec![
        tags_page(&[("v1.3.2", "c3"), ("v1.3.1", "c2")]),
        tags_page(&[("v1.3.0", "c1")]),
    ]);

    let tags = client(&base_url, 2).list_tags().unwrap();
    let requests = server.join().unwrap();

    assert_eq!(tags.len(), 3);
    assert_eq!(tags[2].name, "v1.3.0");
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET /repos/grafana/loki/tags?per_page=2&page=1 "));
    assert!(requests[1].starts_with("GET /repos/grafana/loki/tags?per_page=2&page=2 "));
}

#[test]
fn test_history_follows_end_cursor() {
    let (base_url, server) = serve(vec![
        history_page(&["c4", "c3"], Some("cursor-1"), true),
        history_page(&["c2"], None, false),
    ]);

    let commits = client(&base_url, 2).list_commits_on_branch("main").unwrap();
    let requests = server.join().unwrap();

    let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
    assert_eq!(shas, vec!["c4", "c3", "c2"]);
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("POST /graphql "));
    assert!(requests[0].contains(r#""cursor":null"#));
    assert!(requests[0].contains(r#""branch":"refs/heads/main""#));
    assert!(requests[1].contains(r#""cursor":"cursor-1""#));
}

#[test]
fn test_history_stops_at_max_commits() {
    let (base_url, server) = serve(vec![
        history_page(&["c6", "c5"], Some("cursor-1"), true),
        history_page(&["c4", "c3"], Some("cursor-2"), true),
    ]);

    let commits = client(&base_url, 2)
        .with_max_commits(Some(3))
        .list_commits_on_branch("main")
        .unwrap();
    let requests = server.join().unwrap();

    assert_eq!(commits.len(), 3);
    assert_eq!(commits[2].sha, "c4");
    assert_eq!(requests.len(), 2);
}

#[test]
fn test_history_zero_page_size_requests_one() {
    let (base_url, server) = serve(vec![history_page(&["c1"], None, false)]);

    let commits = client(&base_url, 0).list_commits_on_branch("main").unwrap();
    let requests = server.join().unwrap();

    assert_eq!(commits.len(), 1);
    assert!(requests[0].contains(r#""perPage":1"#));
}

#[test]
fn test_history_next_page_without_cursor_fails_once() {
    let (base_url, server) = serve(vec![history_page(&[], None, true)]);

    let err = client(&base_url, 0)
        .list_commits_on_branch("main")
        .unwrap_err();
    let requests = server.join().unwrap();

    assert!(matches!(err, ReleaseRangeError::Api(_)), "got {}", err);
    assert_eq!(requests.len(), 1);
}

#[test]
fn test_graphql_errors_become_api_error() {
    let (base_url, server) = serve(vec![(
        200,
        json!({ "data": null, "errors": [ { "message": "Bad credentials" } ] }).to_string(),
    )]);

    let err = client(&base_url, 100)
        .list_commits_on_branch("main")
        .unwrap_err();
    server.join().unwrap();

    assert_eq!(err.to_string(), "GitHub API error: Bad credentials");
}

#[test]
fn test_missing_branch_is_api_error() {
    let (base_url, server) = serve(vec![(
        200,
        json!({ "data": { "repository": { "ref": null } } }).to_string(),
    )]);

    let err = client(&base_url, 100)
        .list_commits_on_branch("release-9.9.x")
        .unwrap_err();
    server.join().unwrap();

    assert!(err.to_string().contains("Branch 'release-9.9.x' not found"));
}

#[test]
fn test_http_error_status_becomes_api_error() {
    let (base_url, server) = serve(vec![(
        401,
        json!({ "message": "Bad credentials" }).to_string(),
    )]);

    let err = client(&base_url, 100).list_tags().unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, ReleaseRangeError::Api(_)), "got {}", err);
    assert!(err.to_string().contains("HTTP 401"), "got {}", err);
}
