//! Backend REST service configuration
//!
//! Each backend resource family (forum threads, forum entries, tickets) is
//! reached through a base URL of the form
//! `{scheme}://{host}:{port}/{entry_point}`. Resolvers receive these URLs
//! from here instead of relying on compiled-in constants.

use crate::error::ConfigResult;
use crate::validation::{
    validate_enum_choice, validate_positive, validate_required_string, validate_url, Validatable,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently deployed REST service fronted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendFamily {
    Threads,
    Entries,
    Tickets,
}

impl BackendFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendFamily::Threads => "threads",
            BackendFamily::Entries => "entries",
            BackendFamily::Tickets => "tickets",
        }
    }

    pub fn all() -> &'static [BackendFamily] {
        &[
            BackendFamily::Threads,
            BackendFamily::Entries,
            BackendFamily::Tickets,
        ]
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Addresses of all backend services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BackendsConfig {
    /// Forum service serving threads and entries
    #[serde(default)]
    pub forum: ForumServiceConfig,

    /// Ticket service
    #[serde(default)]
    pub ticket: ServiceConfig,
}

/// Forum service location and resource paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumServiceConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_forum_port")]
    pub port: u16,

    /// API prefix, e.g. `api/v1`
    #[serde(default = "default_forum_entry_point")]
    pub entry_point: String,

    /// Path of the thread collection below the entry point
    #[serde(default = "default_threads_path")]
    pub threads_path: String,

    /// Path of the entry collection below the entry point
    #[serde(default = "default_entries_path")]
    pub entries_path: String,
}

/// Location of a single-resource service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_ticket_port")]
    pub port: u16,

    /// Path of the resource collection, e.g. `api/v1/tickets`
    #[serde(default = "default_ticket_entry_point")]
    pub entry_point: String,
}

impl BackendsConfig {
    /// Base URL resolvers use for a resource family
    pub fn base_url(&self, family: BackendFamily) -> String {
        match family {
            BackendFamily::Threads => self.forum.threads_url(),
            BackendFamily::Entries => self.forum.entries_url(),
            BackendFamily::Tickets => self.ticket.base_url(),
        }
    }
}

impl ForumServiceConfig {
    pub fn base_url(&self) -> String {
        service_url(&self.scheme, &self.host, self.port, &self.entry_point)
    }

    pub fn threads_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.threads_path.trim_matches('/'))
    }

    pub fn entries_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.entries_path.trim_matches('/'))
    }
}

impl ServiceConfig {
    pub fn base_url(&self) -> String {
        service_url(&self.scheme, &self.host, self.port, &self.entry_point)
    }
}

fn service_url(scheme: &str, host: &str, port: u16, entry_point: &str) -> String {
    let entry_point = entry_point.trim_matches('/');
    if entry_point.is_empty() {
        format!("{}://{}:{}", scheme, host, port)
    } else {
        format!("{}://{}:{}/{}", scheme, host, port, entry_point)
    }
}

impl Default for ForumServiceConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_forum_port(),
            entry_point: default_forum_entry_point(),
            threads_path: default_threads_path(),
            entries_path: default_entries_path(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_ticket_port(),
            entry_point: default_ticket_entry_point(),
        }
    }
}

impl Validatable for BackendsConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.forum.validate()?;
        self.ticket.validate()?;

        for family in BackendFamily::all() {
            validate_url(&self.base_url(*family), family.as_str(), self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "backends"
    }
}

impl Validatable for ForumServiceConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_enum_choice(&self.scheme, &["http", "https"], "scheme", self.domain_name())?;
        validate_required_string(&self.host, "host", self.domain_name())?;
        validate_positive(self.port, "port", self.domain_name())?;
        validate_required_string(&self.threads_path, "threads_path", self.domain_name())?;
        validate_required_string(&self.entries_path, "entries_path", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "backends.forum"
    }
}

impl Validatable for ServiceConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_enum_choice(&self.scheme, &["http", "https"], "scheme", self.domain_name())?;
        validate_required_string(&self.host, "host", self.domain_name())?;
        validate_positive(self.port, "port", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "backends.ticket"
    }
}

// Default value functions
fn default_scheme() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_forum_port() -> u16 {
    4000
}

fn default_forum_entry_point() -> String {
    "api/v1".to_string()
}

fn default_threads_path() -> String {
    "threads".to_string()
}

fn default_entries_path() -> String {
    "entrys".to_string()
}

fn default_ticket_port() -> u16 {
    4001
}

fn default_ticket_entry_point() -> String {
    "api/v1/tickets".to_string()
}
