use async_trait::async_trait;
use chrono::Utc;
use seedscope_core::cache::SnapshotCache;
use seedscope_core::config::{ConfigFile, ViewSettings};
use seedscope_core::grouping::GroupingMode;
use seedscope_core::best_score::BestScoreSource;
use seedscope_core::model::{BestScores, Execution, Objective, TestCase};
use seedscope_core::repository::{ConfigSource, MemoryRepository, ResultRepository};
use seedscope_core::view::TreeNode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn max_config() -> Arc<dyn ConfigSource> {
    Arc::new(ConfigFile {
        objective: Some(Objective::Max),
        ..Default::default()
    })
}

fn seeded_repo() -> Arc<MemoryRepository> {
    Arc::new(MemoryRepository::new(
        vec![Execution::new("20240101_000000", Utc::now())],
        vec![
            TestCase::new("20240101_000000", 0, 100.0, 0.5),
            TestCase::new("20240101_000000", 1, 0.0, 0.5),
        ],
    ))
}

#[tokio::test]
async fn test_cache_serves_same_snapshot_until_refresh() -> anyhow::Result<()> {
    let repo = seeded_repo();
    let cache = SnapshotCache::new(repo.clone(), max_config());

    let a = cache.get().await?;
    let b = cache.get().await?;
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.load_count(), 1);

    // New data is invisible until refresh.
    repo.push_execution(
        Execution::new("20240102_000000", Utc::now()),
        vec![TestCase::new("20240102_000000", 0, 200.0, 0.4)],
    )
    .await;
    assert_eq!(cache.get().await?.executions.len(), 1);

    cache.refresh().await;
    assert!(cache.peek().await.is_none());
    let c = cache.get().await?;
    assert_eq!(c.executions.len(), 2);
    assert_eq!(cache.load_count(), 2);

    // The old snapshot is untouched by the rebuild.
    assert_eq!(a.executions.len(), 1);
    assert_eq!(a.best_scores.get(&0), Some(&100.0));
    assert_eq!(c.best_scores.get(&0), Some(&200.0));
    assert_eq!(
        c.execution_stats("20240101_000000")
            .unwrap()
            .average_relative_score,
        25.0
    );
    Ok(())
}

#[tokio::test]
async fn test_refresh_picks_up_external_best_scores() -> anyhow::Result<()> {
    let repo = seeded_repo();
    let cache = SnapshotCache::new(repo.clone(), max_config());
    assert_eq!(cache.get().await?.best_score_source, BestScoreSource::Recomputed);

    let table: BestScores = [(0, 400.0)].into_iter().collect();
    repo.set_best_scores(Some(table)).await;
    assert_eq!(cache.get().await?.best_score_source, BestScoreSource::Recomputed);

    cache.refresh().await;
    let snapshot = cache.get().await?;
    assert_eq!(snapshot.best_score_source, BestScoreSource::External);
    let stats = snapshot.execution_stats("20240101_000000").unwrap();
    assert_eq!(stats.relative_scores.get(&0), Some(&25.0));

    repo.set_best_scores(None).await;
    cache.refresh().await;
    assert_eq!(cache.get().await?.best_scores.get(&0), Some(&100.0));
    Ok(())
}

struct SlowRepository {
    inner: MemoryRepository,
    reads: AtomicUsize,
}

#[async_trait]
impl ResultRepository for SlowRepository {
    async fn list_executions(&self) -> anyhow::Result<Vec<Execution>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.inner.list_executions().await
    }

    async fn list_test_cases(&self) -> anyhow::Result<Vec<TestCase>> {
        self.inner.list_test_cases().await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_queries_share_one_load() -> anyhow::Result<()> {
    let repo = Arc::new(SlowRepository {
        inner: MemoryRepository::new(
            vec![Execution::new("E", Utc::now())],
            vec![TestCase::new("E", 3, 5.0, 0.1)],
        ),
        reads: AtomicUsize::new(0),
    });
    let cache = Arc::new(SnapshotCache::new(repo.clone(), max_config()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move { cache.get().await }));
    }
    let mut snapshots = Vec::new();
    for h in handles {
        snapshots.push(h.await??);
    }

    assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
    assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    Ok(())
}

struct FailingRepository;

#[async_trait]
impl ResultRepository for FailingRepository {
    async fn list_executions(&self) -> anyhow::Result<Vec<Execution>> {
        anyhow::bail!("results directory is unreadable")
    }

    async fn list_test_cases(&self) -> anyhow::Result<Vec<TestCase>> {
        Ok(vec![])
    }
}

#[tokio::test]
async fn test_failed_load_leaves_cache_empty() {
    let cache = SnapshotCache::new(Arc::new(FailingRepository), max_config());
    let err = cache.get().await.unwrap_err();
    assert!(err.to_string().contains("unreadable"));
    assert!(cache.peek().await.is_none());

    let cache = SnapshotCache::new(seeded_repo(), Arc::new(ConfigFile::default()));
    let err = cache.get().await.unwrap_err();
    assert!(err.is_missing_configuration());
    assert_eq!(cache.load_count(), 0);
}

#[tokio::test]
async fn test_children_queries() -> anyhow::Result<()> {
    let cache = SnapshotCache::new(seeded_repo(), max_config());

    let roots = cache.children(None, None).await?;
    assert_eq!(roots.len(), 1);
    assert_eq!(
        roots[0].node,
        TreeNode::Execution {
            execution_id: "20240101_000000".into()
        }
    );
    assert!(roots[0].description.contains("AC 1/2"));

    let leaves = cache.children(Some(&roots[0].node), None).await?;
    assert_eq!(leaves.len(), 2);
    assert!(leaves.iter().all(|l| !l.has_children));
    assert!(leaves[1].description.starts_with("WA"));

    let by_seed = ViewSettings {
        grouping: GroupingMode::BySeed,
        ..Default::default()
    };
    let seeds = cache.children(None, Some(&by_seed)).await?;
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].label, "0000");
    let unknown = cache
        .children(Some(&TreeNode::Seed { seed: 42 }), Some(&by_seed))
        .await?;
    assert!(unknown.is_empty());

    assert_eq!(cache.load_count(), 1);
    Ok(())
}
