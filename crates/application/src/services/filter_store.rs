use chrono::{DateTime, Utc};
use listwarden_domain::{
    Filter, FilterEntry, FilterId, FilterKind, FilterProperties, FilteringConfig, PropertyChange,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::ports::{
    FetchOutcome, FetchRequest, FilterContentStore, FilterDescriptor, FilterListSnapshot,
    FilterSource,
};

/// A successful fetch waiting to be merged back into the store.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub request: FetchRequest,
    pub outcome: FetchOutcome,
    pub fetched_at: DateTime<Utc>,
}

struct Collections {
    blocklists: Vec<Filter>,
    allowlists: Vec<Filter>,
    user_rules: Vec<String>,
    next_id: FilterId,
}

impl Collections {
    fn list(&self, kind: FilterKind) -> &Vec<Filter> {
        match kind {
            FilterKind::Blocklist => &self.blocklists,
            FilterKind::Allowlist => &self.allowlists,
        }
    }

    fn list_mut(&mut self, kind: FilterKind) -> &mut Vec<Filter> {
        match kind {
            FilterKind::Blocklist => &mut self.blocklists,
            FilterKind::Allowlist => &mut self.allowlists,
        }
    }

    fn all(&self) -> impl Iterator<Item = &Filter> {
        self.blocklists.iter().chain(self.allowlists.iter())
    }

    fn exists(&self, url: &str) -> bool {
        self.all().any(|f| f.url.as_ref() == url)
    }

    fn allocate_id(&mut self) -> FilterId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn advance_past_max_id(&mut self) {
        if let Some(max) = self.all().map(|f| f.id).max() {
            if self.next_id <= max {
                self.next_id = max + 1;
            }
        }
    }
}

/// The filter registry: block-lists, allow-lists and the user rules.
///
/// Every read and write of the collections goes through one reader/writer
/// lock. The id counter lives under the same lock so ids stay unique across
/// both collections.
pub struct FilterStore {
    inner: RwLock<Collections>,
    content: Arc<dyn FilterContentStore>,
}

impl FilterStore {
    pub fn new(
        content: Arc<dyn FilterContentStore>,
        blocklists: Vec<Filter>,
        allowlists: Vec<Filter>,
        user_rules: Vec<String>,
    ) -> Self {
        Self {
            inner: RwLock::new(Collections {
                blocklists,
                allowlists,
                user_rules,
                // Ids start at the current Unix time.
                next_id: Utc::now().timestamp(),
            }),
            content,
        }
    }

    pub fn from_config(content: Arc<dyn FilterContentStore>, config: &FilteringConfig) -> Self {
        let to_filters = |entries: &[FilterEntry], kind: FilterKind| -> Vec<Filter> {
            entries
                .iter()
                .cloned()
                .map(|e| e.into_filter(kind))
                .collect()
        };

        Self::new(
            content,
            to_filters(&config.filters, FilterKind::Blocklist),
            to_filters(&config.whitelist_filters, FilterKind::Allowlist),
            config.user_rules.clone(),
        )
    }

    /// Startup pass: assign ids, drop duplicate block-list URLs and load
    /// metadata of every enabled filter from its content file.
    pub async fn initialize(&self) {
        self.assign_ids().await;
        let removed = self.deduplicate().await;
        if removed > 0 {
            info!(removed, "Removed duplicate block-list entries");
        }

        let mut inner = self.inner.write().await;
        let Collections {
            blocklists,
            allowlists,
            ..
        } = &mut *inner;

        for filter in blocklists.iter_mut().chain(allowlists.iter_mut()) {
            if !filter.enabled {
                continue;
            }
            if let Err(e) = load_into(self.content.as_ref(), filter).await {
                error!(
                    filter_id = filter.id,
                    error = %e,
                    "Couldn't load filter contents"
                );
            }
        }
    }

    /// True if `url` is present in either collection.
    pub async fn exists(&self, url: &str) -> bool {
        self.inner.read().await.exists(url)
    }

    /// Reserve a fresh filter id.
    pub async fn next_filter_id(&self) -> FilterId {
        self.inner.write().await.allocate_id()
    }

    /// Append `filter` to its collection unless its URL is already used by
    /// either collection. A zero id is replaced by a fresh one.
    pub async fn add(&self, mut filter: Filter) -> bool {
        let mut inner = self.inner.write().await;

        if inner.exists(&filter.url) {
            return false;
        }

        if filter.id == 0 {
            filter.id = inner.allocate_id();
        }

        debug!(filter_id = filter.id, url = %filter.url, kind = filter.kind.as_str(), "Adding filter");
        inner.list_mut(filter.kind).push(filter);
        true
    }

    /// Apply an administrative edit to the filter with `url` in `kind`.
    pub async fn set_properties(
        &self,
        url: &str,
        props: FilterProperties,
        kind: FilterKind,
    ) -> PropertyChange {
        let mut inner = self.inner.write().await;

        if props.url.as_ref() != url && inner.exists(&props.url) {
            if inner.list(kind).iter().any(|f| f.url.as_ref() == url) {
                return PropertyChange::url_conflict();
            }
            return PropertyChange::not_found();
        }

        let Some(filter) = inner.list_mut(kind).iter_mut().find(|f| f.url.as_ref() == url) else {
            return PropertyChange::not_found();
        };

        debug!(
            url,
            new_name = %props.name,
            new_url = %props.url,
            enabled = props.enabled,
            "Setting filter properties"
        );

        let mut change = PropertyChange {
            found: true,
            ..PropertyChange::default()
        };

        filter.name = props.name;

        if filter.url != props.url {
            change.url_changed = true;
            change.update_required = true;
            filter.url = props.url;
            filter.invalidate();
        }

        if filter.enabled != props.enabled {
            change.enabled_changed = true;
            filter.enabled = props.enabled;

            if !filter.enabled {
                filter.unload();
            } else if !change.url_changed {
                if let Err(e) = load_into(self.content.as_ref(), filter).await {
                    // The file may have been removed from disk behind our back.
                    warn!(filter_id = filter.id, error = %e, "Couldn't load filter on enable");
                    filter.invalidate();
                    change.update_required = true;
                }
            }
        }

        change
    }

    /// Remove the filter with `url` from `kind`, returning it.
    pub async fn remove(&self, url: &str, kind: FilterKind) -> Option<Filter> {
        let mut inner = self.inner.write().await;
        let list = inner.list_mut(kind);
        let pos = list.iter().position(|f| f.url.as_ref() == url)?;
        Some(list.remove(pos))
    }

    /// Keep only the first block-list entry for each URL, in order.
    pub async fn deduplicate(&self) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.blocklists.len();

        let mut seen = HashSet::new();
        let kept: Vec<Filter> = std::mem::take(&mut inner.blocklists)
            .into_iter()
            .filter(|f| seen.insert(f.url.clone()))
            .collect();
        inner.blocklists = kept;

        before - inner.blocklists.len()
    }

    /// Give every filter without an id (or with an id already taken) a
    /// fresh one, then move the counter past the largest id in use.
    pub async fn assign_ids(&self) {
        let mut inner = self.inner.write().await;
        inner.advance_past_max_id();

        let mut seen = HashSet::new();
        let mut next_id = inner.next_id;
        let Collections {
            blocklists,
            allowlists,
            ..
        } = &mut *inner;

        for filter in blocklists.iter_mut().chain(allowlists.iter_mut()) {
            if filter.id == 0 || !seen.insert(filter.id) {
                filter.id = next_id;
                next_id += 1;
                seen.insert(filter.id);
            }
        }

        inner.next_id = next_id;
    }

    pub async fn list(&self, kind: FilterKind) -> Vec<Filter> {
        self.inner.read().await.list(kind).clone()
    }

    pub async fn get(&self, url: &str, kind: FilterKind) -> Option<Filter> {
        self.inner
            .read()
            .await
            .list(kind)
            .iter()
            .find(|f| f.url.as_ref() == url)
            .cloned()
    }

    pub async fn user_filter(&self) -> Filter {
        Filter::user(&self.inner.read().await.user_rules)
    }

    pub async fn set_user_rules(&self, rules: Vec<String>) {
        self.inner.write().await.user_rules = rules;
    }

    /// The persisted view of both collections and the user rules.
    pub async fn snapshot(&self) -> FilterListSnapshot {
        let inner = self.inner.read().await;
        FilterListSnapshot {
            filters: inner.blocklists.iter().map(FilterEntry::from).collect(),
            whitelist_filters: inner.allowlists.iter().map(FilterEntry::from).collect(),
            user_rules: inner.user_rules.clone(),
        }
    }

    /// Copy out what is needed to re-fetch every enabled filter of `kind`
    /// whose refresh interval has passed (or all of them when `force`).
    pub async fn due_for_refresh(
        &self,
        kind: FilterKind,
        force: bool,
        interval_hours: u32,
        now: DateTime<Utc>,
    ) -> Vec<FetchRequest> {
        self.inner
            .read()
            .await
            .list(kind)
            .iter()
            .filter(|f| f.enabled && (force || f.is_due(now, interval_hours)))
            .map(|f| FetchRequest {
                id: f.id,
                url: f.url.clone(),
                name: f.name.clone(),
                checksum: f.known_checksum(),
            })
            .collect()
    }

    /// Merge successful fetches into `kind`, matching on `(id, url)`.
    ///
    /// Entries edited or removed while their fetch was in flight no longer
    /// match and are skipped. Content promoted for a removed entry is
    /// deleted again. Returns how many filters got new content.
    pub async fn commit(&self, kind: FilterKind, results: &[FetchResult]) -> usize {
        let mut inner = self.inner.write().await;
        let list = inner.list_mut(kind);
        let mut updated = 0;
        let mut orphaned = Vec::new();

        for result in results {
            let Some(pos) = list
                .iter()
                .position(|f| f.id == result.request.id && f.url == result.request.url)
            else {
                debug!(filter_id = result.request.id, "Filter changed during refresh, skipping");
                let removed = !list.iter().any(|f| f.id == result.request.id);
                if removed && result.outcome.is_changed() {
                    orphaned.push(result.request.id);
                }
                continue;
            };
            let filter = &mut list[pos];

            filter.last_updated = Some(result.fetched_at);

            if let FetchOutcome::Changed(stats) = &result.outcome {
                info!(
                    filter_id = filter.id,
                    old_rules = filter.rule_count,
                    new_rules = stats.rule_count,
                    "Updated filter"
                );
                if let Some(title) = &stats.title {
                    filter.name = Arc::from(title.as_str());
                }
                filter.apply_stats(stats);
                updated += 1;
            }
        }
        drop(inner);

        for id in orphaned {
            if let Err(e) = self.content.remove(id).await {
                warn!(filter_id = id, error = %e, "Couldn't delete content of removed filter");
            }
        }

        updated
    }

    /// Descriptors for the serving engine: the user filter first, then every
    /// enabled filter by content path.
    pub async fn activation_set(&self) -> (Vec<FilterDescriptor>, Vec<FilterDescriptor>) {
        let inner = self.inner.read().await;

        let user = Filter::user(&inner.user_rules);
        let mut blocklists = Vec::with_capacity(inner.blocklists.len() + 1);
        blocklists.push(FilterDescriptor {
            id: user.id,
            source: FilterSource::Inline(user.inline_data.unwrap_or_else(|| Arc::from(""))),
        });

        let by_path = |f: &Filter| FilterDescriptor {
            id: f.id,
            source: FilterSource::File(self.content.content_path(f.id)),
        };

        blocklists.extend(inner.blocklists.iter().filter(|f| f.enabled).map(by_path));
        let allowlists = inner
            .allowlists
            .iter()
            .filter(|f| f.enabled)
            .map(by_path)
            .collect();

        (blocklists, allowlists)
    }
}

async fn load_into(
    content: &dyn FilterContentStore,
    filter: &mut Filter,
) -> Result<(), listwarden_domain::DomainError> {
    let loaded = content.load(filter.id).await?;
    filter.apply_stats(&loaded.stats);
    filter.last_updated = loaded.modified;
    Ok(())
}
