//! Utilities shared by the typeahead engine and its hosts: the debounce and
//! throttle rate limiter, settings loading, and path helpers.

pub mod paths;
pub mod rate_limit;
pub mod settings;

pub use paths::{app_config_path, expand_home};
pub use rate_limit::{DEFAULT_RATE_LIMIT_DELAY, Debouncer, RateLimiter, RateLimiterConfig, Throttler};
pub use settings::{SETTINGS_PATH_ENV, SettingsError, TypeaheadSettings, default_settings_path};
