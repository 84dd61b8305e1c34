//! End-to-end upload flow against a mock image host
//!
//! Drives the workflow with a fake Telegram fetcher and a real
//! `HostingClient` pointed at a mockito server.

use anyhow::Result;
use async_trait::async_trait;
use imglink_bot::auth::AllowList;
use imglink_bot::formats::{FormatKey, CHOICE_PROMPT, RETURN_ACTION};
use imglink_bot::upload::{FormTokenProtocol, HostingClient};
use imglink_bot::workflow::{IncomingContent, MediaFetcher, MediaRef, Sender, Workflow};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Writes fixed bytes and remembers where
#[derive(Default)]
struct RecordingFetcher {
    paths: Mutex<Vec<PathBuf>>,
}

impl RecordingFetcher {
    fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaFetcher for RecordingFetcher {
    async fn fetch(&self, _file_id: &str, destination: &Path) -> Result<()> {
        tokio::fs::write(destination, b"fake png bytes").await?;
        self.paths.lock().unwrap().push(destination.to_path_buf());
        Ok(())
    }
}

fn alice() -> Sender {
    Sender {
        user_id: 100,
        display_name: "Alice".to_string(),
    }
}

fn photo() -> IncomingContent {
    IncomingContent::Photo(MediaRef {
        file_id: "AgACAgIAAxkBAAI".to_string(),
        file_size: 4096,
        file_name: None,
        mime_type: None,
    })
}

fn workflow_for(server: &mockito::ServerGuard, allow_list: AllowList) -> Workflow {
    let client = HostingClient::new(
        &format!("{}/api/index.php", server.url()),
        Arc::new(FormTokenProtocol::default()),
    );
    Workflow::new(allow_list, Arc::new(client), "api-key")
}

#[tokio::test]
async fn authorized_photo_is_uploaded_once_and_menu_works() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/index.php")
        .with_status(200)
        .with_body(r#"{"result":"success","code":200,"url":"https://img.example/i/cat.jpg"}"#)
        .expect(1)
        .create_async()
        .await;

    let workflow = workflow_for(&server, AllowList::parse(Some("100")));
    let fetcher = RecordingFetcher::default();

    let menu = workflow.handle_content(&alice(), &photo(), &fetcher).await;
    assert_eq!(menu.text, CHOICE_PROMPT);
    mock.assert_async().await;

    let paths = fetcher.paths();
    assert_eq!(paths.len(), 1);
    assert!(!paths[0].exists(), "temporary file must be removed");

    let html = workflow
        .handle_selection(&alice(), FormatKey::Html.as_str())
        .await
        .unwrap();
    assert_eq!(html.text, r#"<img src="https://img.example/i/cat.jpg" alt="image">"#);
    let actions: Vec<_> = html.all_actions().collect();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].data, RETURN_ACTION);

    let back = workflow
        .handle_selection(&alice(), RETURN_ACTION)
        .await
        .unwrap();
    assert_eq!(back, menu);
}

#[tokio::test]
async fn provider_failure_still_removes_temp_file() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/index.php")
        .with_status(200)
        .with_body(r#"{"result":"error","code":403,"message":"token invalid"}"#)
        .expect(1)
        .create_async()
        .await;

    let workflow = workflow_for(&server, AllowList::default());
    let fetcher = RecordingFetcher::default();

    let reply = workflow.handle_content(&alice(), &photo(), &fetcher).await;
    assert_eq!(reply.text, "❌ Upload failed: token invalid");
    assert!(reply.actions.is_empty());

    let paths = fetcher.paths();
    assert_eq!(paths.len(), 1);
    assert!(!paths[0].exists());
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/index.php")
        .with_status(502)
        .create_async()
        .await;

    let workflow = workflow_for(&server, AllowList::default());
    let reply = workflow
        .handle_content(&alice(), &photo(), &RecordingFetcher::default())
        .await;

    assert!(reply.text.starts_with("❌ Upload failed"));
    assert!(reply.text.contains("502"));
}

#[tokio::test]
async fn stranger_never_reaches_the_host() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let workflow = workflow_for(&server, AllowList::parse(Some("1,2,3")));
    let fetcher = RecordingFetcher::default();

    let reply = workflow.handle_content(&alice(), &photo(), &fetcher).await;
    assert!(reply.text.contains("not permitted"));
    assert!(fetcher.paths().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn second_upload_replaces_links() {
    let mut server = mockito::Server::new_async().await;
    let _first = server
        .mock("POST", "/api/index.php")
        .with_status(200)
        .with_body(r#"{"result":"success","code":200,"url":"https://img.example/1.png"}"#)
        .expect(1)
        .create_async()
        .await;

    let workflow = workflow_for(&server, AllowList::default());
    let fetcher = RecordingFetcher::default();
    workflow.handle_content(&alice(), &photo(), &fetcher).await;

    server.reset();
    let _second = server
        .mock("POST", "/api/index.php")
        .with_status(200)
        .with_body(r#"{"result":"success","code":200,"url":"https://img.example/2.png"}"#)
        .expect(1)
        .create_async()
        .await;
    workflow.handle_content(&alice(), &photo(), &fetcher).await;

    let direct = workflow.handle_selection(&alice(), "direct").await.unwrap();
    assert_eq!(direct.text, "https://img.example/2.png");
    assert_eq!(workflow.session().len().await, 1);
}
