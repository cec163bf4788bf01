/// In-memory cache of the bundled datasets.
///
/// Each collection is loaded at most once per epoch. Concurrent callers asking for a
/// collection that is still loading wait on the same `OnceCell` and receive the same `Arc`.
/// A failed load leaves the cell empty so a later call can retry, except under
/// `LoadFailurePolicy::Degrade`, where WebIDL/CSS/elements failures are replaced by an
/// empty collection for the rest of the epoch.
///
/// `invalidate` swaps in a fresh epoch; the next access reloads from disk.
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::{error, info, warn};

use crate::config::LoadFailurePolicy;
use crate::error::AppError;
use crate::loader;
use crate::model::{CssEntry, Dataset, ElementEntry, SpecRecord};

/// Lowercased copies of the searchable fields of one record.
#[derive(Debug, Clone)]
pub struct SpecKeys {
    pub shortname: String,
    pub series: Option<String>,
    pub title: String,
    pub abstract_text: Option<String>,
}

impl SpecKeys {
    fn new(spec: &SpecRecord) -> Self {
        Self {
            shortname: spec.shortname.to_lowercase(),
            series: spec.series_shortname().map(str::to_lowercase),
            title: spec.title.to_lowercase(),
            abstract_text: spec.abstract_text.as_deref().map(str::to_lowercase),
        }
    }
}

/// The specification listing plus its point-lookup indices.
#[derive(Debug)]
pub struct SpecIndex {
    specs: Vec<SpecRecord>,
    keys: Vec<SpecKeys>,
    by_shortname: HashMap<String, usize>,
    by_series: HashMap<String, usize>,
}

impl SpecIndex {
    /// Builds both indices. Shortnames are expected to be unique already (the loader
    /// rejects duplicates); a series alias maps to the series' current specification
    /// when that record is present, otherwise to the first record carrying the alias.
    pub fn new(specs: Vec<SpecRecord>) -> Self {
        let keys: Vec<SpecKeys> = specs.iter().map(SpecKeys::new).collect();

        let mut by_shortname = HashMap::with_capacity(keys.len());
        for (i, k) in keys.iter().enumerate() {
            by_shortname.entry(k.shortname.clone()).or_insert(i);
        }

        let mut by_series: HashMap<String, usize> = HashMap::new();
        for (i, k) in keys.iter().enumerate() {
            if let Some(series) = &k.series {
                by_series.entry(series.clone()).or_insert(i);
            }
        }
        for spec in &specs {
            let Some(series) = &spec.series else { continue };
            let Some(current) = &series.current_specification else { continue };
            if let Some(&i) = by_shortname.get(&current.to_lowercase()) {
                by_series.insert(series.shortname.to_lowercase(), i);
            }
        }

        Self {
            specs,
            keys,
            by_shortname,
            by_series,
        }
    }

    pub fn all(&self) -> &[SpecRecord] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Records paired with their lowercased keys, in listing order.
    pub fn entries(&self) -> impl Iterator<Item = (&SpecRecord, &SpecKeys)> {
        self.specs.iter().zip(self.keys.iter())
    }

    /// `key` must already be lowercased.
    pub fn by_shortname(&self, key: &str) -> Option<&SpecRecord> {
        self.by_shortname.get(key).map(|&i| &self.specs[i])
    }

    /// `key` must already be lowercased.
    pub fn by_series(&self, key: &str) -> Option<&SpecRecord> {
        self.by_series.get(key).map(|&i| &self.specs[i])
    }
}

#[derive(Debug, Default)]
pub struct WebIdlCollection {
    pub blobs: BTreeMap<String, String>,
    pub degraded: bool,
}

#[derive(Debug, Default)]
pub struct CssCollection {
    pub entries: Vec<CssEntry>,
    pub degraded: bool,
}

#[derive(Debug, Default)]
pub struct ElementCollection {
    pub by_spec: BTreeMap<String, Vec<ElementEntry>>,
    pub degraded: bool,
}

/// Collections that may be replaced by an empty stand-in when loading fails.
trait Degradable: Sized {
    fn degraded() -> Self;
    fn len(&self) -> usize;
}

impl Degradable for WebIdlCollection {
    fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    fn len(&self) -> usize {
        self.blobs.len()
    }
}

impl Degradable for CssCollection {
    fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Degradable for ElementCollection {
    fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    fn len(&self) -> usize {
        self.by_spec.values().map(Vec::len).sum()
    }
}

struct Epoch {
    id: u64,
    specs: OnceCell<Arc<SpecIndex>>,
    webidl: OnceCell<Arc<WebIdlCollection>>,
    css: OnceCell<Arc<CssCollection>>,
    elements: OnceCell<Arc<ElementCollection>>,
}

impl Epoch {
    fn new(id: u64) -> Self {
        Self {
            id,
            specs: OnceCell::new(),
            webidl: OnceCell::new(),
            css: OnceCell::new(),
            elements: OnceCell::new(),
        }
    }
}

pub struct DatasetCache {
    data_path: PathBuf,
    policy: LoadFailurePolicy,
    epoch: RwLock<Arc<Epoch>>,
    next_epoch: AtomicU64,
}

impl DatasetCache {
    pub fn new(data_path: impl Into<PathBuf>, policy: LoadFailurePolicy) -> Self {
        Self {
            data_path: data_path.into(),
            policy,
            epoch: RwLock::new(Arc::new(Epoch::new(0))),
            next_epoch: AtomicU64::new(1),
        }
    }

    async fn current(&self) -> Arc<Epoch> {
        Arc::clone(&*self.epoch.read().await)
    }

    /// Identifier of the current epoch; changes on every `invalidate`.
    pub async fn epoch(&self) -> u64 {
        self.current().await.id
    }

    pub async fn specifications(&self) -> Result<Arc<SpecIndex>, AppError> {
        let epoch = self.current().await;
        epoch
            .specs
            .get_or_try_init(|| async {
                let specs = loader::load_specifications(&self.data_path)
                    .await
                    .inspect_err(|e| error!(error = %e, "failed to load specifications"))?;
                let index = SpecIndex::new(specs);
                info!(epoch = epoch.id, specs = index.len(), "specifications loaded");
                Ok::<_, AppError>(Arc::new(index))
            })
            .await
            .cloned()
    }

    pub async fn webidl(&self) -> Result<Arc<WebIdlCollection>, AppError> {
        let epoch = self.current().await;
        epoch
            .webidl
            .get_or_try_init(|| {
                self.load_degradable(epoch.id, Dataset::WebIdl, async {
                    let blobs = loader::load_webidl(&self.data_path).await?;
                    Ok(WebIdlCollection {
                        blobs,
                        degraded: false,
                    })
                })
            })
            .await
            .cloned()
    }

    pub async fn css(&self) -> Result<Arc<CssCollection>, AppError> {
        let epoch = self.current().await;
        epoch
            .css
            .get_or_try_init(|| {
                self.load_degradable(epoch.id, Dataset::Css, async {
                    let entries = loader::load_css(&self.data_path).await?;
                    Ok(CssCollection {
                        entries,
                        degraded: false,
                    })
                })
            })
            .await
            .cloned()
    }

    pub async fn elements(&self) -> Result<Arc<ElementCollection>, AppError> {
        let epoch = self.current().await;
        epoch
            .elements
            .get_or_try_init(|| {
                self.load_degradable(epoch.id, Dataset::Elements, async {
                    let by_spec = loader::load_elements(&self.data_path).await?;
                    Ok(ElementCollection {
                        by_spec,
                        degraded: false,
                    })
                })
            })
            .await
            .cloned()
    }

    /// Loads all four collections concurrently.
    pub async fn preload_all(&self) -> Result<(), AppError> {
        let (specs, webidl, css, elements) =
            tokio::try_join!(self.specifications(), self.webidl(), self.css(), self.elements())?;
        info!(
            specs = specs.len(),
            webidl = webidl.blobs.len(),
            css = css.entries.len(),
            element_specs = elements.by_spec.len(),
            "datasets preloaded"
        );
        Ok(())
    }

    /// Drops every memoized collection and index.
    pub async fn invalidate(&self) {
        let id = self.next_epoch.fetch_add(1, Ordering::Relaxed);
        *self.epoch.write().await = Arc::new(Epoch::new(id));
        info!(epoch = id, "dataset cache invalidated");
    }

    async fn load_degradable<T: Degradable>(
        &self,
        epoch: u64,
        dataset: Dataset,
        load: impl Future<Output = Result<T, AppError>>,
    ) -> Result<Arc<T>, AppError> {
        match load.await {
            Ok(collection) => {
                info!(epoch, dataset = %dataset, entries = collection.len(), "dataset loaded");
                Ok(Arc::new(collection))
            }
            Err(e) if self.policy == LoadFailurePolicy::Degrade => {
                warn!(epoch, dataset = %dataset, error = %e, "dataset failed to load, serving empty collection");
                Ok(Arc::new(T::degraded()))
            }
            Err(e) => {
                error!(epoch, dataset = %dataset, error = %e, "dataset failed to load");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::future::join_all;

    use super::*;
    use crate::loader::{CSS_FILE, SPECS_FILE};
    use crate::test_support::{fixture_index, write_fixture_bundle};

    #[test]
    fn series_alias_prefers_current_specification() {
        let index = fixture_index();
        let spec = index.by_series("service-workers").unwrap();
        assert_eq!(spec.shortname, "service-workers-2");
    }

    #[test]
    fn series_alias_without_current_uses_first_variant() {
        let index = fixture_index();
        let spec = index.by_series("css-flexbox").unwrap();
        assert_eq!(spec.shortname, "css-flexbox-1");
    }

    #[test]
    fn shortname_index_is_exact() {
        let index = fixture_index();
        assert_eq!(index.by_shortname("fetch").unwrap().title, "Fetch Standard");
        assert!(index.by_shortname("fetc").is_none());
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_load() {
        let dir = write_fixture_bundle();
        let cache = DatasetCache::new(dir.path(), LoadFailurePolicy::Fail);

        let loaded = join_all((0..8).map(|_| cache.specifications())).await;
        let first = loaded[0].as_ref().unwrap();
        for other in &loaded[1..] {
            assert!(Arc::ptr_eq(first, other.as_ref().unwrap()));
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_degradable_loads() {
        let dir = write_fixture_bundle();
        let cache = DatasetCache::new(dir.path(), LoadFailurePolicy::Degrade);

        let (idl, css, elements) = tokio::join!(
            join_all((0..8).map(|_| cache.webidl())),
            join_all((0..8).map(|_| cache.css())),
            join_all((0..8).map(|_| cache.elements())),
        );
        let idl: Vec<_> = idl.into_iter().map(Result::unwrap).collect();
        let css: Vec<_> = css.into_iter().map(Result::unwrap).collect();
        let elements: Vec<_> = elements.into_iter().map(Result::unwrap).collect();
        assert!(idl.iter().all(|c| Arc::ptr_eq(c, &idl[0])));
        assert!(css.iter().all(|c| Arc::ptr_eq(c, &css[0])));
        assert!(elements.iter().all(|c| Arc::ptr_eq(c, &elements[0])));
        assert!(!css[0].degraded);

        // Preloading the same epoch reuses what is already loaded.
        cache.preload_all().await.unwrap();
        assert!(Arc::ptr_eq(&idl[0], &cache.webidl().await.unwrap()));
        assert!(Arc::ptr_eq(&css[0], &cache.css().await.unwrap()));
        assert!(Arc::ptr_eq(&elements[0], &cache.elements().await.unwrap()));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_degraded_value() {
        let dir = write_fixture_bundle();
        std::fs::remove_dir_all(dir.path().join(loader::ELEMENTS_DIR)).unwrap();
        let cache = DatasetCache::new(dir.path(), LoadFailurePolicy::Degrade);

        let loaded = join_all((0..8).map(|_| cache.elements())).await;
        let first = loaded[0].as_ref().unwrap();
        assert!(first.degraded);
        for other in &loaded[1..] {
            assert!(Arc::ptr_eq(first, other.as_ref().unwrap()));
        }
    }

    #[tokio::test]
    async fn invalidate_starts_a_new_epoch() {
        let dir = write_fixture_bundle();
        let cache = DatasetCache::new(dir.path(), LoadFailurePolicy::Fail);

        cache.preload_all().await.unwrap();
        let before = cache.specifications().await.unwrap();
        let epoch_before = cache.epoch().await;
        assert!(Arc::ptr_eq(&before, &cache.specifications().await.unwrap()));

        cache.invalidate().await;
        let after = cache.specifications().await.unwrap();
        assert_ne!(cache.epoch().await, epoch_before);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.len(), after.len());
    }

    #[tokio::test]
    async fn invalidate_picks_up_changed_data() {
        let dir = write_fixture_bundle();
        let cache = DatasetCache::new(dir.path(), LoadFailurePolicy::Fail);
        assert!(cache.specifications().await.unwrap().len() > 1);

        std::fs::write(
            dir.path().join(SPECS_FILE),
            r#"[{"shortname":"dom","title":"DOM Standard","url":"https://dom.spec.whatwg.org/","organization":"WHATWG"}]"#,
        )
        .unwrap();
        assert!(cache.specifications().await.unwrap().len() > 1);

        cache.invalidate().await;
        assert_eq!(cache.specifications().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn degrade_policy_serves_empty_css() {
        let dir = write_fixture_bundle();
        std::fs::write(dir.path().join(CSS_FILE), "{ broken").unwrap();
        let cache = DatasetCache::new(dir.path(), LoadFailurePolicy::Degrade);

        let css = cache.css().await.unwrap();
        assert!(css.degraded);
        assert!(css.entries.is_empty());

        // The degraded value is memoized until the epoch changes.
        std::fs::write(dir.path().join(CSS_FILE), r#"{"properties":[{"name":"color"}]}"#).unwrap();
        assert!(Arc::ptr_eq(&css, &cache.css().await.unwrap()));
        cache.preload_all().await.unwrap();

        cache.invalidate().await;
        let css = cache.css().await.unwrap();
        assert!(!css.degraded);
        assert_eq!(css.entries.len(), 1);
    }

    #[tokio::test]
    async fn fail_policy_propagates_and_retries() {
        let dir = write_fixture_bundle();
        let idl_dir = dir.path().join(loader::IDL_DIR);
        std::fs::remove_dir_all(&idl_dir).unwrap();
        let cache = DatasetCache::new(dir.path(), LoadFailurePolicy::Fail);

        assert!(matches!(cache.webidl().await, Err(AppError::Common(_))));
        assert!(cache.preload_all().await.is_err());

        std::fs::create_dir(&idl_dir).unwrap();
        std::fs::write(idl_dir.join("dom.idl"), "interface Node {};").unwrap();
        let idl = cache.webidl().await.unwrap();
        assert!(!idl.degraded);
        assert_eq!(idl.blobs.len(), 1);
    }

    #[tokio::test]
    async fn specification_failures_are_never_degraded() {
        let dir = write_fixture_bundle();
        std::fs::write(dir.path().join(SPECS_FILE), "[{}]").unwrap();
        let cache = DatasetCache::new(dir.path(), LoadFailurePolicy::Degrade);

        assert!(matches!(
            cache.specifications().await,
            Err(AppError::InvalidData { dataset: Dataset::Specifications, .. })
        ));
    }
}
