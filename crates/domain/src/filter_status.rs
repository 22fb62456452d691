/// What a property edit changed.
///
/// `url_exists` is reported on its own: when the new URL is already taken the
/// edit is rejected and no other flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyChange {
    pub found: bool,
    pub enabled_changed: bool,
    pub url_changed: bool,
    pub url_exists: bool,
    pub update_required: bool,
}

impl PropertyChange {
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn url_conflict() -> Self {
        Self {
            url_exists: true,
            ..Self::default()
        }
    }

    /// The serving engine must be reloaded to reflect this edit.
    pub fn needs_activation(&self) -> bool {
        self.found && (self.enabled_changed || self.url_changed)
    }
}
