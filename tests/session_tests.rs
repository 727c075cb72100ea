use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Url;

use wikifind::client::WikiClient;
use wikifind::error::SearchError;
use wikifind::session::SearchSession;

mod test_helpers {
    use axum::Router;
    use axum::extract::Query;
    use axum::routing::get;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Loopback stand-in for the Wikipedia endpoint. Queries starting with
    /// "slow" are delayed so a newer search can overtake them; "hang" never
    /// answers within any reasonable deadline.
    pub async fn spawn_opensearch_stub() -> anyhow::Result<String> {
        let app = Router::new().route("/w/api.php", get(opensearch));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(format!("http://{}/w/api.php", addr))
    }

    async fn opensearch(Query(params): Query<HashMap<String, String>>) -> String {
        let query = params.get("search").cloned().unwrap_or_default();
        let callback = params.get("callback").cloned().unwrap_or_default();

        if query == "hang" {
            tokio::time::sleep(Duration::from_secs(60)).await;
        } else if query.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }

        let payload = serde_json::json!([
            query,
            [format!("{query} One")],
            ["First paragraph."],
            ["https://en.wikipedia.org/wiki/One"]
        ]);
        format!("/**/{callback}({payload});")
    }
}

use test_helpers::*;

fn session_for(api_url: &str) -> Result<Arc<SearchSession>> {
    let client = WikiClient::new(Url::parse(api_url)?, Duration::from_secs(5));
    Ok(Arc::new(SearchSession::new(client)))
}

#[tokio::test]
async fn single_search_resolves_with_validated_hits() -> Result<()> {
    let api_url = spawn_opensearch_stub().await?;
    let session = session_for(&api_url)?;

    let result = session.search("ferris").await?;
    assert_eq!(result.query, "ferris");
    assert_eq!(result.titles, vec!["ferris One"]);
    assert_eq!(result.len(), 1);
    Ok(())
}

#[tokio::test]
async fn sequential_searches_each_resolve() -> Result<()> {
    let api_url = spawn_opensearch_stub().await?;
    let session = session_for(&api_url)?;

    let first = session.search("alpha").await?;
    let second = session.search("beta").await?;

    assert_eq!(first.query, "alpha");
    assert_eq!(second.query, "beta");
    Ok(())
}

#[tokio::test]
async fn stale_search_is_superseded_by_a_newer_one() -> Result<()> {
    let api_url = spawn_opensearch_stub().await?;
    let session = session_for(&api_url)?;

    let slow = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.search("slow rust").await })
    };
    // Let the slow search get in flight before overtaking it
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = session.search("ferris").await?;

    assert_eq!(fast.query, "ferris");
    assert!(matches!(slow.await?, Err(SearchError::Superseded)));
    Ok(())
}

#[tokio::test]
async fn superseded_search_leaves_no_pending_entries() -> Result<()> {
    let api_url = spawn_opensearch_stub().await?;
    let client = WikiClient::new(Url::parse(&api_url)?, Duration::from_millis(300));
    let session = Arc::new(SearchSession::new(client));

    // A search against a hung endpoint, superseded while still in flight
    let hung = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.search("hang").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = session.search("ferris").await?;

    assert_eq!(fast.query, "ferris");
    assert!(matches!(hung.await?, Err(SearchError::Superseded)));

    // Wait out the transport deadline too, then nothing may remain pending
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(session.client().bridge().registry().pending_count(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_searches_have_exactly_one_winner() -> Result<()> {
    let api_url = spawn_opensearch_stub().await?;
    let session = session_for(&api_url)?;

    let mut handles = Vec::new();
    for i in 0..6 {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(
            async move { session.search(&format!("slow {i}")).await },
        ));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => winners += 1,
            Err(SearchError::Superseded) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    // However the submissions interleave, the newest installed search must
    // win and no older one may cancel it.
    assert_eq!(winners, 1);
    Ok(())
}
