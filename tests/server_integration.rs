//! Preview server routes, exercised over HTTP against an in-memory catalogue.

use std::sync::Arc;

use spp_catalog::catalog::Catalog;
use spp_catalog::config::Config;
use spp_catalog::error::Result;
use spp_catalog::models::{
    RawProgramDetail, RawProgramSummary, RawProjectFile, ScoredProjectRow,
};
use spp_catalog::server::run_server_with_catalog;
use spp_catalog::traits::DataSource;

struct MemorySource;

impl DataSource for MemorySource {
    fn read_summaries(&self) -> Result<Vec<RawProgramSummary>> {
        Ok(vec![RawProgramSummary {
            spp_number: "SPP 2433".to_string(),
            title: "Soft Robotics".to_string(),
            wissenschaftsbereich: "Ingenieurwissenschaften".to_string(),
            ..Default::default()
        }])
    }

    fn read_details(&self) -> Result<Vec<RawProgramDetail>> {
        Ok(Vec::new())
    }

    fn read_scored_rows(&self) -> Result<Vec<ScoredProjectRow>> {
        Ok((1..=30)
            .map(|i| ScoredProjectRow {
                project_id: i.to_string(),
                spp_number: "SPP 2433".to_string(),
                title: if i == 1 {
                    "<b>Bold</b> gripper".to_string()
                } else {
                    format!("Project {}", i)
                },
                ai_score: if i <= 3 { "2.0" } else { "0" }.to_string(),
                wearables_score: "0".to_string(),
                combined_score: format!("{}", 31 - i),
                ..Default::default()
            })
            .collect())
    }

    fn read_project_files(&self) -> Result<Vec<RawProjectFile>> {
        Ok(Vec::new())
    }

    fn read_summary_markdown(&self, _spp_number: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

async fn start_server() -> (u16, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let mut config = Config::minimal();
    config.server.bind = format!("127.0.0.1:{}", port);
    config.site.base_url = "/site/".to_string();

    let catalog = Arc::new(Catalog::load(Arc::new(MemorySource), 1.0).unwrap());
    let handle = tokio::spawn(async move {
        run_server_with_catalog(&config, catalog).await.unwrap();
    });
    wait_for_server(port).await;
    (port, handle)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_stats_and_programs() {
    let (port, server_handle) = start_server().await;
    let client = reqwest::Client::new();

    let stats: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/stats", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_programs"], 1);
    assert_eq!(stats["total_projects"], 30);
    assert_eq!(stats["ai_relevant"], 3);

    let programs: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/programs", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(programs["programs"][0]["slug"], "spp-2433");
    assert_eq!(programs["programs"][0]["projects_count"], 30);

    server_handle.abort();
}

#[tokio::test]
async fn test_api_projects_reads_url_state() {
    let (port, server_handle) = start_server().await;
    let client = reqwest::Client::new();

    let page: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/projects?page=2", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 30);
    assert_eq!(page["page"], 2);
    assert_eq!(page["pages"], 2);
    assert_eq!(page["projects"].as_array().unwrap().len(), 5);
    assert_eq!(page["pagination"], serde_json::json!([1, 2]));

    let page: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/projects?tab=ai&sort=title", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["total"], 3);
    assert_eq!(page["projects"][0]["title"], "<b>Bold</b> gripper");

    let resp = client
        .get(format!("http://127.0.0.1:{}/api/projects?tab=robots", port))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    server_handle.abort();
}

#[tokio::test]
async fn test_programme_fragment_is_escaped() {
    let (port, server_handle) = start_server().await;
    let client = reqwest::Client::new();

    let html = client
        .get(format!("http://127.0.0.1:{}/programs/spp-2433?q=gripper", port))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt; gripper"));
    assert!(!html.contains("<b>Bold</b>"));
    assert!(!html.contains("Project 2"));

    let html = client
        .get(format!("http://127.0.0.1:{}/programs/spp-2433", port))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"aria-current="page""#));

    let html = client
        .get(format!("http://127.0.0.1:{}/programs/spp-2433?page=9", port))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!html.contains("No projects match"));
    assert!(html.contains("past the last page"));
    assert!(html.contains("<nav"));
    assert!(html.contains(r#"data-page="1""#));

    let resp = client
        .get(format!("http://127.0.0.1:{}/programs/spp-1", port))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");

    server_handle.abort();
}

#[tokio::test]
async fn test_focus_fragment_links_programmes() {
    let (port, server_handle) = start_server().await;
    let client = reqwest::Client::new();

    let html = client
        .get(format!("http://127.0.0.1:{}/focus/ai", port))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("AI Score: 2.0"));
    assert!(html.contains(r#"href="/site/programs/spp-2433/""#));
    assert!(!html.contains("<nav"));

    let resp = client
        .get(format!("http://127.0.0.1:{}/focus/robots", port))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    server_handle.abort();
}
