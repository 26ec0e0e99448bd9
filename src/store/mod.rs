// src/store/mod.rs

mod snapshot;

pub use snapshot::{CategoryRecords, Snapshot};

use crate::config::Config;
use crate::dataset::{Dataset, Economic, EconomicRecord};
use crate::error::LoadError;
use crate::fetch::Fetcher;
use crate::process::parse_dataset;
use chrono::Utc;
use std::sync::Arc;
use tokio::{
    sync::{watch, Mutex},
    time::Instant,
};
use tracing::{debug, error, info, warn};

/// Counts from a load that actually fetched and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub records: usize,
    /// Data rows that failed the dataset's required-field checks.
    pub dropped: usize,
    pub categories: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(LoadReport),
    /// A previous load already succeeded; nothing was fetched.
    AlreadyLoaded,
}

/// In-memory cache for one dataset. The first successful `load()` fills it;
/// after that it never changes.
pub struct DatasetStore<D: Dataset, F> {
    fetcher: F,
    path: String,
    state: watch::Sender<Snapshot<D::Record>>,
    /// Held for the whole fetch-and-publish sequence.
    load_gate: Mutex<()>,
}

impl<D: Dataset, F: Fetcher> DatasetStore<D, F> {
    pub fn new(fetcher: F, path: impl Into<String>) -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        Self {
            fetcher,
            path: path.into(),
            state,
            load_gate: Mutex::new(()),
        }
    }

    /// Store for `D` at the path the config assigns it.
    pub fn from_config(fetcher: F, cfg: &Config) -> Self {
        Self::new(fetcher, D::path(cfg))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch and parse the dataset unless an earlier call already did.
    ///
    /// Concurrent callers queue on the load gate; whoever gets it after a
    /// successful load returns `AlreadyLoaded` without fetching. A failed
    /// load records its message in `Snapshot::error` and leaves the store
    /// empty, so a later call tries again.
    #[tracing::instrument(level = "info", skip(self), fields(dataset = D::NAME, path = %self.path))]
    pub async fn load(&self) -> Result<LoadOutcome, LoadError> {
        if self.is_loaded() {
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        let _gate = self.load_gate.lock().await;
        if self.is_loaded() {
            debug!("loaded by a concurrent caller");
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
        let _loading = LoadingGuard { state: &self.state };
        let start = Instant::now();

        let text = match self.fetcher.fetch_text(&self.path).await {
            Ok(text) => text,
            Err(source) => {
                let err = LoadError::Fetch {
                    dataset: D::NAME,
                    source,
                };
                error!(error = %err, "load failed");
                let message = err.to_string();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
                return Err(err);
            }
        };

        let parsed = parse_dataset::<D>(&text);
        let report = LoadReport {
            records: parsed.records.len(),
            dropped: parsed.dropped,
            categories: parsed.categories.len(),
        };
        if report.dropped > 0 {
            warn!(dropped = report.dropped, "dropped malformed rows");
        }

        self.state.send_modify(|s| {
            s.records = Arc::from(parsed.records);
            s.categories = Arc::from(parsed.categories);
            s.is_loading = false;
            s.loaded_at = Some(Utc::now());
        });

        info!(
            records = report.records,
            categories = report.categories,
            bytes = text.len(),
            elapsed = ?start.elapsed(),
            "loaded"
        );
        Ok(LoadOutcome::Loaded(report))
    }
}

/// Clears `is_loading` when a load ends without publishing, e.g. when the
/// `load()` future is dropped mid-fetch.
struct LoadingGuard<'a, R> {
    state: &'a watch::Sender<Snapshot<R>>,
}

impl<R> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        let abandoned = self
            .state
            .send_if_modified(|s| std::mem::replace(&mut s.is_loading, false));
        if abandoned {
            warn!("load abandoned before completion");
        }
    }
}

impl<D: Dataset, F> DatasetStore<D, F> {
    pub fn is_loaded(&self) -> bool {
        self.state.borrow().is_loaded()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn records(&self) -> Arc<[D::Record]> {
        self.state.borrow().records.clone()
    }

    pub fn categories(&self) -> Arc<[String]> {
        self.state.borrow().categories.clone()
    }

    pub fn snapshot(&self) -> Snapshot<D::Record> {
        self.state.borrow().clone()
    }

    /// Watch state changes (loading flag, error, records).
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<D::Record>> {
        self.state.subscribe()
    }

    /// Cached records of `category`, in file order. Empty before a load.
    pub fn records_for_category(&self, category: &str) -> CategoryRecords<D::Record> {
        CategoryRecords::new(self.records(), category, D::category)
    }
}

impl<F> DatasetStore<Economic, F> {
    /// First cached record for `category` in `year`.
    pub fn record_for_category_and_year(&self, category: &str, year: i32) -> Option<EconomicRecord> {
        self.state
            .borrow()
            .records
            .iter()
            .find(|r| r.country == category && r.year == year)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Chapter2;
    use crate::error::FetchError;
    use std::{
        io,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    const ECONOMIC_CSV: &str = "Country;Year;GDP;UnemploymentRate;Emission\n\
        \"United States\";2008;14,769.9;5.8;5,931\n\
        \"United States\";2009;14,478.1;9.3;5,491\n\
        Germany;2008;3,752.4;7.5;854\n\
        Germany;2009\n\
        France;n/a;1;2;3\n";

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,moneymoves::store=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    /// Serves a fixed body, failing the first `failures` calls.
    struct MockFetcher {
        body: &'static str,
        failures: AtomicUsize,
        hits: AtomicUsize,
        delay: Duration,
    }

    impl MockFetcher {
        fn ok(body: &'static str) -> Self {
            Self {
                body,
                failures: AtomicUsize::new(0),
                hits: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn failing(body: &'static str, failures: usize) -> Self {
            Self {
                failures: AtomicUsize::new(failures),
                ..Self::ok(body)
            }
        }

        fn slow(body: &'static str, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::ok(body)
            }
        }

        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    impl Fetcher for MockFetcher {
        async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let failed = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failed {
                return Err(FetchError::Io {
                    path: path.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
                });
            }
            Ok(self.body.to_string())
        }
    }

    fn economic(fetcher: MockFetcher) -> DatasetStore<Economic, MockFetcher> {
        DatasetStore::new(fetcher, "data/combined_data.csv")
    }

    #[tokio::test]
    async fn second_load_does_not_fetch() -> anyhow::Result<()> {
        init_test_logging();
        let store = economic(MockFetcher::ok(ECONOMIC_CSV));

        let first = store.load().await?;
        assert_eq!(
            first,
            LoadOutcome::Loaded(LoadReport {
                records: 3,
                dropped: 2,
                categories: 3,
            })
        );
        assert_eq!(store.load().await?, LoadOutcome::AlreadyLoaded);
        assert_eq!(store.fetcher.hits(), 1);

        assert_eq!(
            store.categories().to_vec(),
            vec!["France", "Germany", "United States"]
        );
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_loads_fetch_once() -> anyhow::Result<()> {
        init_test_logging();
        let store = Arc::new(economic(MockFetcher::slow(
            ECONOMIC_CSV,
            Duration::from_millis(50),
        )));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.load().await })
            })
            .collect();

        let mut loaded = 0;
        for h in handles {
            if let LoadOutcome::Loaded(_) = h.await?? {
                loaded += 1;
            }
        }
        assert_eq!(loaded, 1);
        assert_eq!(store.fetcher.hits(), 1);
        assert_eq!(store.records().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_failure_is_recorded() {
        init_test_logging();
        let store = economic(MockFetcher::failing(ECONOMIC_CSV, 1));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch { dataset: "economic", .. }));

        let snap = store.snapshot();
        assert!(snap.error.as_deref().is_some_and(|m| m.contains("no such file")));
        assert!(snap.records.is_empty());
        assert!(!snap.is_loading);
        assert!(!snap.is_loaded());
    }

    #[tokio::test]
    async fn load_after_failure_retries_and_clears_error() -> anyhow::Result<()> {
        let store = economic(MockFetcher::failing(ECONOMIC_CSV, 1));

        assert!(store.load().await.is_err());
        assert!(matches!(store.load().await?, LoadOutcome::Loaded(_)));
        assert_eq!(store.error(), None);
        assert_eq!(store.fetcher.hits(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_load_clears_loading_flag() {
        let store = economic(MockFetcher::slow(ECONOMIC_CSV, Duration::from_secs(3600)));
        let mut rx = store.subscribe();

        let res = tokio::time::timeout(Duration::from_millis(20), store.load()).await;
        assert!(res.is_err(), "load should still be fetching");

        assert!(!store.is_loading());
        assert!(!store.is_loaded());
        assert!(store.records().is_empty());
        assert!(!rx.borrow_and_update().is_loading);
        // the gate was released with the dropped future
        assert!(store.load_gate.try_lock().is_ok());
    }

    #[tokio::test]
    async fn lookups_before_load_are_empty() {
        let store = economic(MockFetcher::ok(ECONOMIC_CSV));
        assert_eq!(store.records_for_category("Germany").count(), 0);
        assert_eq!(store.record_for_category_and_year("Germany", 2008), None);
        assert!(store.categories().is_empty());
    }

    #[tokio::test]
    async fn lookups_after_load() -> anyhow::Result<()> {
        let store = economic(MockFetcher::ok(ECONOMIC_CSV));
        store.load().await?;

        let years: Vec<i32> = store
            .records_for_category("United States")
            .map(|r| r.year)
            .collect();
        assert_eq!(years, vec![2008, 2009]);

        let ger = store
            .record_for_category_and_year("Germany", 2008)
            .expect("Germany 2008 should be cached");
        assert_eq!(ger.gdp, Some(3752.4));
        assert_eq!(ger.emission, Some(854.0));
        assert_eq!(store.record_for_category_and_year("Germany", 2009), None);
        assert_eq!(store.records_for_category("France").count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn subscribers_see_loading_then_data() -> anyhow::Result<()> {
        let store = Arc::new(economic(MockFetcher::slow(
            ECONOMIC_CSV,
            Duration::from_millis(50),
        )));
        let mut rx = store.subscribe();

        let loader = {
            let store = store.clone();
            tokio::spawn(async move { store.load().await })
        };

        rx.wait_for(|s| s.is_loading).await?;
        let snap = rx.wait_for(|s| s.is_loaded()).await?.clone();
        assert!(!snap.is_loading);
        assert_eq!(snap.records.len(), 3);

        loader.await??;
        Ok(())
    }

    #[tokio::test]
    async fn bundled_sample_data_loads_from_disk() -> anyhow::Result<()> {
        use crate::fetch::FileFetcher;

        let public = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("public");
        let cfg = Config::default();
        let chapter2: DatasetStore<Chapter2, _> =
            DatasetStore::from_config(FileFetcher::new(&public), &cfg);
        let economic: DatasetStore<Economic, _> =
            DatasetStore::from_config(FileFetcher::new(&public), &cfg);

        let (c2, eco) = tokio::join!(chapter2.load(), economic.load());
        assert!(matches!(
            c2?,
            LoadOutcome::Loaded(LoadReport { records: 4, dropped: 0, .. })
        ));
        assert!(matches!(
            eco?,
            LoadOutcome::Loaded(LoadReport { records: 6, dropped: 1, categories: 3 })
        ));

        let us = economic
            .record_for_category_and_year("United States", 2009)
            .expect("sample has United States 2009");
        assert_eq!(us.unemployment, Some(9.3));
        assert_eq!(chapter2.records_for_category("Greece").count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn chapter2_store_from_config() -> anyhow::Result<()> {
        let csv = "Country,GDP change,Note,Unemployment,Inflation,Oil $,Oil kg\n\
                   Greece,-4.3,x,12.7,1.2,1200,900\n\
                   \"France\",-2.9,x,9.1,0.1,,\n";
        let store: DatasetStore<Chapter2, _> =
            DatasetStore::from_config(MockFetcher::ok(csv), &Config::default());
        assert_eq!(store.path(), "data/chapter_2_data.csv");

        store.load().await?;
        let france: Vec<_> = store.records_for_category("France").collect();
        assert_eq!(france.len(), 1);
        assert_eq!(france[0].oil_imports_dollars, None);
        assert_eq!(store.categories().to_vec(), vec!["France", "Greece"]);
        Ok(())
    }
}
