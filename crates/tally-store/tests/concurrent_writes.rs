//! Concurrent writers against the filesystem backend

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tally_core::types::{DatasetId, ModelId, Run, RunId, RunStatus, RunUpdate, SampleResult};
use tally_store::{LocalStore, MemoryStore, PageRequest, StoreHandles};
use tempfile::TempDir;

fn result(run_id: RunId, line: usize) -> SampleResult {
    SampleResult {
        run_id,
        line,
        question: format!("What is {} + {}?", line, line),
        ground_truth: (line * 2).to_string(),
        raw_output: Some(format!("answer: {}", line * 2)),
        request_failed: false,
        extracted_answer: (line * 2).to_string(),
        is_correct: true,
        instruction_followed: true,
        latency_ms: line as f64,
        tokens_used: line as u64,
        completed_at: Utc::now(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_are_all_persisted() {
    let temp = TempDir::new().unwrap();
    let stores = StoreHandles::from_backend(Arc::new(LocalStore::with_path(temp.path())));
    let run_id = RunId::new();

    let writes = (1..=50).map(|line| {
        let sink = stores.results.clone();
        tokio::spawn(async move { sink.append(&result(run_id, line)).await })
    });
    for outcome in join_all(writes).await {
        outcome.unwrap().unwrap();
    }

    let all = stores.result_log.all(run_id).await.unwrap();
    assert_eq!(all.len(), 50);
    let mut lines: Vec<_> = all.iter().map(|r| r.line).collect();
    lines.sort_unstable();
    assert_eq!(lines, (1..=50).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_start_updates_admit_exactly_one() {
    let temp = TempDir::new().unwrap();
    let stores = StoreHandles::from_backend(Arc::new(LocalStore::with_path(temp.path())));
    let run = Run::pending(ModelId::new(), DatasetId::new());
    stores.runs.create_run(&run).await.unwrap();
    let run_id = run.id;

    let attempts = (0..8).map(|_| {
        let runs = stores.runs.clone();
        tokio::spawn(
            async move { runs.update_run(run_id, RunUpdate::Started { at: Utc::now() }).await },
        )
    });
    let successes = join_all(attempts)
        .await
        .into_iter()
        .filter(|outcome| matches!(outcome, Ok(Ok(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(
        stores.runs.get_run(run_id).await.unwrap().status,
        RunStatus::Running
    );
}

#[tokio::test]
async fn memory_backend_pages_in_append_order() {
    let stores = StoreHandles::from_backend(Arc::new(MemoryStore::new()));
    let run_id = RunId::new();
    for line in [3, 1, 2] {
        stores.results.append(&result(run_id, line)).await.unwrap();
    }

    let page = stores
        .result_log
        .page(run_id, PageRequest::new(0, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(
        page.items.iter().map(|r| r.line).collect::<Vec<_>>(),
        vec![3, 1]
    );
}
