use crate::filter::FilterKind;

/// Scope and policy of a refresh request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshFlags {
    /// Ignore `last_updated` and re-fetch every enabled filter.
    pub force: bool,
    pub blocklists: bool,
    pub allowlists: bool,
}

impl RefreshFlags {
    /// Both collections, expiry-gated.
    pub fn all() -> Self {
        Self {
            force: false,
            blocklists: true,
            allowlists: true,
        }
    }

    pub fn only(kind: FilterKind) -> Self {
        Self {
            force: false,
            blocklists: kind == FilterKind::Blocklist,
            allowlists: kind == FilterKind::Allowlist,
        }
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn includes(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Blocklist => self.blocklists,
            FilterKind::Allowlist => self.allowlists,
        }
    }
}

/// Result of one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Filters whose content actually changed.
    pub updated: usize,
    /// Every attempted scope failed entirely; drives scheduler backoff.
    pub network_error: bool,
}
