//! Run configuration.
//!
//! A [`Settings`] value is built once at process start (from the environment,
//! a YAML file, or both) and travels by reference inside every
//! [`Session`](crate::Session). Nothing in the crate reads the environment on
//! its own.

use crate::locator::Wait;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Placeholder printed instead of secrets
pub const REDACTED: &str = "********";

/// Deployment the suite runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// staging.osf.io
    #[default]
    Stage1,
    /// staging2.osf.io
    Stage2,
    /// staging3.osf.io
    Stage3,
    /// test.osf.io
    Test,
    /// osf.io
    Prod,
    /// A developer stack on localhost
    Local,
}

impl Domain {
    /// Web front-end root
    #[must_use]
    pub const fn osf_home(self) -> &'static str {
        match self {
            Self::Stage1 => "https://staging.osf.io",
            Self::Stage2 => "https://staging2.osf.io",
            Self::Stage3 => "https://staging3.osf.io",
            Self::Test => "https://test.osf.io",
            Self::Prod => "https://osf.io",
            Self::Local => "http://localhost:5000",
        }
    }

    /// API root
    #[must_use]
    pub const fn api_domain(self) -> &'static str {
        match self {
            Self::Stage1 => "https://api.staging.osf.io",
            Self::Stage2 => "https://api.staging2.osf.io",
            Self::Stage3 => "https://api.staging3.osf.io",
            Self::Test => "https://api.test.osf.io",
            Self::Prod => "https://api.osf.io",
            Self::Local => "http://localhost:8000",
        }
    }

    /// CAS (login service) root
    #[must_use]
    pub const fn cas_domain(self) -> &'static str {
        match self {
            Self::Stage1 => "https://accounts.staging.osf.io",
            Self::Stage2 => "https://accounts.staging2.osf.io",
            Self::Stage3 => "https://accounts.staging3.osf.io",
            Self::Test => "https://accounts.test.osf.io",
            Self::Prod => "https://accounts.osf.io",
            Self::Local => "http://localhost:8080",
        }
    }

    /// Short name used in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stage1 => "stage1",
            Self::Stage2 => "stage2",
            Self::Stage3 => "stage3",
            Self::Test => "test",
            Self::Prod => "prod",
            Self::Local => "local",
        }
    }
}

impl FromStr for Domain {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stage1" | "staging" => Ok(Self::Stage1),
            "stage2" | "staging2" => Ok(Self::Stage2),
            "stage3" | "staging3" => Ok(Self::Stage3),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            "local" => Ok(Self::Local),
            other => Err(ProbeError::config(format!("Unknown domain: {other}"))),
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timeout constants in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Short probes (`present()`, transient indicators)
    pub quick_ms: u64,
    /// Default selector timeout
    pub default_ms: u64,
    /// Slow widgets
    pub long_ms: u64,
    /// Pages that render after several API round trips
    pub very_long_ms: u64,
    /// Delay between two polls of the page
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            quick_ms: 1_000,
            default_ms: 10_000,
            long_ms: 30_000,
            very_long_ms: 60_000,
            poll_interval_ms: 100,
        }
    }
}

impl Timeouts {
    /// Resolve a selector's symbolic wait against these constants
    #[must_use]
    pub const fn resolve(&self, wait: Wait) -> Duration {
        match wait {
            Wait::Default => Duration::from_millis(self.default_ms),
            Wait::Quick => Duration::from_millis(self.quick_ms),
            Wait::Long => Duration::from_millis(self.long_ms),
            Wait::VeryLong => Duration::from_millis(self.very_long_ms),
            Wait::Exact(duration) => duration,
        }
    }

    /// Polling interval as a Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Quick timeout as a Duration
    #[must_use]
    pub const fn quick(&self) -> Duration {
        Duration::from_millis(self.quick_ms)
    }

    /// Long timeout as a Duration
    #[must_use]
    pub const fn long(&self) -> Duration {
        Duration::from_millis(self.long_ms)
    }
}

/// Email/password pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

impl Account {
    /// Create an account
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Whether an email is configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.email.is_empty()
    }
}

/// The accounts the scenarios log in with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Primary test user
    pub user_one: Account,
    /// Secondary test user
    pub user_two: Account,
    /// User with two-factor authentication enabled
    pub two_factor_user: Account,
    /// User who has not accepted the terms of service
    pub tos_user: Account,
    /// User who never confirmed their email
    pub unconfirmed_user: Account,
    /// Deactivated user
    pub deactivated_user: Account,
    /// Client id of the developer app used by the OAuth scenarios
    pub devapp_client_id: String,
}

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a window
    pub headless: bool,
    /// Chromium sandbox (disable inside containers)
    pub sandbox: bool,
    /// Chromium executable (None = auto-detect)
    pub executable_path: Option<String>,
    /// Attach to an existing DevTools websocket instead of launching
    pub cdp_endpoint: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            executable_path: None,
            cdp_endpoint: None,
        }
    }
}

/// One row of the capabilities table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Desktop browser name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    /// Mobile device name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Operating system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Operating system version
    pub os_version: String,
    /// Screen resolution as `WIDTHxHEIGHT`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Real device rather than an emulator
    pub real_mobile: bool,
}

impl Capability {
    fn desktop(browser: &str, os: &str, os_version: &str) -> Self {
        Self {
            browser: Some(browser.to_string()),
            device: None,
            os: Some(os.to_string()),
            os_version: os_version.to_string(),
            resolution: Some("1024x768".to_string()),
            real_mobile: false,
        }
    }

    fn mobile(device: &str, os_version: &str) -> Self {
        Self {
            browser: None,
            device: Some(device.to_string()),
            os: None,
            os_version: os_version.to_string(),
            resolution: None,
            real_mobile: true,
        }
    }

    /// Window size parsed from `resolution`
    #[must_use]
    pub fn window_size(&self) -> Option<(u32, u32)> {
        let (w, h) = self.resolution.as_deref()?.split_once('x')?;
        Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
    }
}

/// Capabilities keyed by build name
#[must_use]
pub fn capabilities_table() -> BTreeMap<&'static str, Capability> {
    BTreeMap::from([
        ("chrome", Capability::desktop("Chrome", "Windows", "10")),
        ("edge", Capability::desktop("Edge", "Windows", "10")),
        ("firefox", Capability::desktop("Firefox", "Windows", "10")),
        ("msie", Capability::desktop("IE", "Windows", "7")),
        ("android", Capability::mobile("Samsung Galaxy S8", "7.0")),
        ("ios", Capability::mobile("iPhone 7", "10.0")),
        ("safari", Capability::desktop("Safari", "OS X", "Sierra")),
    ])
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target deployment
    pub domain: Domain,
    // Roots left out of a document stay empty until the parsed domain fills them
    /// Web front-end root (overrides the domain default)
    #[serde(default)]
    pub osf_home: String,
    /// API root (overrides the domain default)
    #[serde(default)]
    pub api_domain: String,
    /// CAS root (overrides the domain default)
    #[serde(default)]
    pub cas_domain: String,
    /// Test accounts
    pub credentials: Credentials,
    /// Timeout constants
    pub timeouts: Timeouts,
    /// Row of the capabilities table
    pub build: String,
    /// Browser launch options
    pub browser: BrowserSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_domain(Domain::default())
    }
}

impl Settings {
    /// Defaults for a domain
    #[must_use]
    pub fn for_domain(domain: Domain) -> Self {
        Self {
            domain,
            osf_home: domain.osf_home().to_string(),
            api_domain: domain.api_domain().to_string(),
            cas_domain: domain.cas_domain().to_string(),
            credentials: Credentials::default(),
            timeouts: Timeouts::default(),
            build: "firefox".to_string(),
            browser: BrowserSettings::default(),
        }
    }

    /// Load from the process environment
    pub fn from_env() -> ProbeResult<Self> {
        let mut settings = Self::default();
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Load from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML content
    pub fn from_yaml_str(content: &str) -> ProbeResult<Self> {
        let mut settings: Self = serde_yaml_ng::from_str(content)?;
        settings.fill_domain_defaults();
        settings.validate()?;
        Ok(settings)
    }

    /// Overlay values from an environment lookup
    ///
    /// `OSF_DOMAIN` resets the three roots to that domain's defaults before
    /// the explicit `OSF_HOME`/`API_DOMAIN`/`CAS_DOMAIN` overrides apply.
    pub fn apply_env<F>(&mut self, lookup: F) -> ProbeResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(domain) = lookup("OSF_DOMAIN") {
            self.domain = domain.parse()?;
            self.osf_home = self.domain.osf_home().to_string();
            self.api_domain = self.domain.api_domain().to_string();
            self.cas_domain = self.domain.cas_domain().to_string();
        }
        if let Some(v) = lookup("OSF_HOME") {
            self.osf_home = v;
        }
        if let Some(v) = lookup("API_DOMAIN") {
            self.api_domain = v;
        }
        if let Some(v) = lookup("CAS_DOMAIN") {
            self.cas_domain = v;
        }

        let accounts: [(&str, &mut Account); 6] = [
            ("USER_ONE", &mut self.credentials.user_one),
            ("USER_TWO", &mut self.credentials.user_two),
            ("CAS_2FA_USER", &mut self.credentials.two_factor_user),
            ("CAS_TOS_USER", &mut self.credentials.tos_user),
            ("UNCONFIRMED_USER", &mut self.credentials.unconfirmed_user),
            ("DEACTIVATED_USER", &mut self.credentials.deactivated_user),
        ];
        for (prefix, account) in accounts {
            if let Some(email) = lookup(prefix) {
                account.email = email;
            }
            if let Some(password) = lookup(&format!("{prefix}_PASSWORD")) {
                account.password = password;
            }
        }

        if let Some(client_id) = lookup("DEVAPP_CLIENT_ID") {
            self.credentials.devapp_client_id = client_id;
        }

        if let Some(build) = lookup("TEST_BUILD") {
            self.build = build;
        }
        if let Some(headless) = lookup("HEADLESS") {
            self.browser.headless = headless
                .parse()
                .map_err(|_| ProbeError::config("Invalid HEADLESS"))?;
        }
        if let Some(path) = lookup("CHROMIUM_PATH") {
            self.browser.executable_path = Some(path);
        }
        if let Some(endpoint) = lookup("CDP_ENDPOINT") {
            self.browser.cdp_endpoint = Some(endpoint);
        }

        self.validate()
    }

    /// Whether the suite is pointed at production
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.domain == Domain::Prod
    }

    /// Capabilities for the configured build
    pub fn desired_capabilities(&self) -> ProbeResult<Capability> {
        capabilities_table()
            .remove(self.build.as_str())
            .ok_or_else(|| ProbeError::config(format!("Unknown TEST_BUILD: {}", self.build)))
    }

    /// Copy with every password replaced by [`REDACTED`]
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for account in [
            &mut copy.credentials.user_one,
            &mut copy.credentials.user_two,
            &mut copy.credentials.two_factor_user,
            &mut copy.credentials.tos_user,
            &mut copy.credentials.unconfirmed_user,
            &mut copy.credentials.deactivated_user,
        ] {
            if !account.password.is_empty() {
                account.password = REDACTED.to_string();
            }
        }
        copy
    }

    fn fill_domain_defaults(&mut self) {
        if self.osf_home.is_empty() {
            self.osf_home = self.domain.osf_home().to_string();
        }
        if self.api_domain.is_empty() {
            self.api_domain = self.domain.api_domain().to_string();
        }
        if self.cas_domain.is_empty() {
            self.cas_domain = self.domain.cas_domain().to_string();
        }
    }

    fn validate(&self) -> ProbeResult<()> {
        self.desired_capabilities()?;
        if self.timeouts.poll_interval_ms == 0 {
            return Err(ProbeError::config("poll_interval_ms must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod domain_tests {
        use super::*;

        #[test]
        fn test_default_is_staging() {
            let settings = Settings::default();
            assert_eq!(settings.osf_home, "https://staging.osf.io");
            assert!(!settings.is_production());
        }

        #[test]
        fn test_parse_aliases() {
            assert_eq!("production".parse::<Domain>().unwrap(), Domain::Prod);
            assert_eq!("STAGE2".parse::<Domain>().unwrap(), Domain::Stage2);
            assert!("mars".parse::<Domain>().is_err());
        }
    }

    mod timeout_tests {
        use super::*;

        #[test]
        fn test_resolve_symbolic_waits() {
            let t = Timeouts::default();
            assert_eq!(t.resolve(Wait::Quick), Duration::from_secs(1));
            assert_eq!(t.resolve(Wait::Default), Duration::from_secs(10));
            assert_eq!(t.resolve(Wait::Long), Duration::from_secs(30));
            assert_eq!(t.resolve(Wait::VeryLong), Duration::from_secs(60));
            assert_eq!(
                t.resolve(Wait::Exact(Duration::from_millis(250))),
                Duration::from_millis(250)
            );
        }
    }

    mod env_tests {
        use super::*;

        #[test]
        fn test_credentials_from_env() {
            let mut settings = Settings::default();
            settings
                .apply_env(lookup(&[
                    ("USER_ONE", "one@example.com"),
                    ("USER_ONE_PASSWORD", "secret"),
                    ("CAS_2FA_USER", "2fa@example.com"),
                ]))
                .unwrap();
            assert_eq!(
                settings.credentials.user_one,
                Account::new("one@example.com", "secret")
            );
            assert!(settings.credentials.two_factor_user.is_configured());
            assert!(!settings.credentials.tos_user.is_configured());
        }

        #[test]
        fn test_devapp_client_id_from_env() {
            let mut settings = Settings::default();
            settings
                .apply_env(lookup(&[("DEVAPP_CLIENT_ID", "abc123")]))
                .unwrap();
            assert_eq!(settings.credentials.devapp_client_id, "abc123");
        }

        #[test]
        fn test_domain_then_override() {
            let mut settings = Settings::default();
            settings
                .apply_env(lookup(&[
                    ("OSF_DOMAIN", "test"),
                    ("CAS_DOMAIN", "https://cas.example.org"),
                ]))
                .unwrap();
            assert_eq!(settings.osf_home, "https://test.osf.io");
            assert_eq!(settings.cas_domain, "https://cas.example.org");
        }

        #[test]
        fn test_unknown_build_rejected() {
            let mut settings = Settings::default();
            let err = settings
                .apply_env(lookup(&[("TEST_BUILD", "netscape")]))
                .unwrap_err();
            assert!(err.to_string().contains("netscape"));
        }

        #[test]
        fn test_invalid_headless_rejected() {
            let mut settings = Settings::default();
            assert!(settings.apply_env(lookup(&[("HEADLESS", "maybe")])).is_err());
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_partial_yaml_fills_domain_defaults() {
            let settings = Settings::from_yaml_str("domain: prod\nbuild: chrome\n").unwrap();
            assert_eq!(settings.osf_home, "https://osf.io");
            assert_eq!(settings.cas_domain, "https://accounts.osf.io");
            assert!(settings.is_production());
            assert_eq!(settings.timeouts, Timeouts::default());
        }

        #[test]
        fn test_yaml_domain_alone_selects_production_roots() {
            let settings = Settings::from_yaml_str("domain: prod\n").unwrap();
            assert_eq!(settings.osf_home, "https://osf.io");
            assert_eq!(settings.api_domain, Domain::Prod.api_domain());
            assert_eq!(settings.cas_domain, "https://accounts.osf.io");
        }

        #[test]
        fn test_yaml_explicit_root_wins_over_domain() {
            let settings =
                Settings::from_yaml_str("domain: test\ncas_domain: https://cas.example.org\n")
                    .unwrap();
            assert_eq!(settings.osf_home, "https://test.osf.io");
            assert_eq!(settings.cas_domain, "https://cas.example.org");
        }

        #[test]
        fn test_yaml_then_env_domain() {
            let mut settings = Settings::from_yaml_str("domain: prod\n").unwrap();
            settings.apply_env(lookup(&[("OSF_DOMAIN", "test")])).unwrap();
            assert_eq!(settings.osf_home, "https://test.osf.io");
            assert!(!settings.is_production());
        }

        #[test]
        fn test_yaml_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("settings.yaml");
            std::fs::write(&path, "timeouts:\n  long_ms: 45000\n").unwrap();
            let settings = Settings::from_yaml_file(&path).unwrap();
            assert_eq!(settings.timeouts.long_ms, 45_000);
            assert_eq!(settings.timeouts.quick_ms, 1_000);
        }
    }

    mod capability_tests {
        use super::*;

        #[test]
        fn test_table_has_all_builds() {
            let table = capabilities_table();
            for build in ["chrome", "edge", "firefox", "msie", "android", "ios", "safari"] {
                assert!(table.contains_key(build), "missing {build}");
            }
        }

        #[test]
        fn test_window_size() {
            let caps = capabilities_table();
            assert_eq!(caps["chrome"].window_size(), Some((1024, 768)));
            assert_eq!(caps["ios"].window_size(), None);
        }

        #[test]
        fn test_redacted_hides_passwords() {
            let mut settings = Settings::default();
            settings.credentials.user_one = Account::new("a@b.c", "hunter2");
            let redacted = settings.redacted();
            assert_eq!(redacted.credentials.user_one.password, REDACTED);
            assert_eq!(redacted.credentials.user_two.password, "");
        }
    }
}
