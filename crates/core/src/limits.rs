//! Shared tuning constants.

/// Quiet period after the last keystroke before an autosave fires.
pub const AUTOSAVE_QUIET_MS: u64 = 600;

/// Default number of rows in the session-picker history list.
pub const HISTORY_PAGE_SIZE: usize = 30;

/// Page size of the deep session reader in the case timeline.
pub const TIMELINE_PAGE_SIZE: usize = 5;

/// Note previews rendered per phase card in the timeline overview.
pub const PREVIEWS_PER_PHASE: usize = 2;

/// Maximum characters per note preview, truncated at a char boundary.
pub const PREVIEW_MAX_CHARS: usize = 120;

/// PostgreSQL pool sizing.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 5;
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 600;
