//! Shared test utilities for herald server tests.

// Helpers are used across test files; each file is compiled on its own.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use herald_domain::{
    CallerContext, DirectoryClient, DomainError, DomainResult, GroupMembership, TokenProvider,
};
use herald_server::config::ServerConfig;
use herald_storage::{MemoryKeyValueStore, TableEntity};
use secrecy::{ExposeSecret, SecretString};

/// Group configured as the gate in test configs.
pub const AUTHORS_GROUP: &str = "0b5c2d7e-authors";

/// Tenant the test token provider issues tokens for.
pub const HOME_TENANT: &str = "72f988bf-home";

/// Signed-in caller of the home tenant carrying a bearer assertion.
pub fn signed_in(user_id: &str) -> CallerContext {
    CallerContext::new(user_id)
        .with_tenant(HOME_TENANT)
        .with_assertion(SecretString::from(format!("assertion-{user_id}")))
}

/// On-behalf-of token provider.
///
/// Exchanges `assertion-<user>` for `token-for-<user>`. A caller without an
/// assertion has no session and gets no token; a caller from another tenant
/// gets an error.
#[derive(Default)]
pub struct StaticTokenProvider {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn acquire_token(
        &self,
        caller: &CallerContext,
        _scopes: &[String],
    ) -> DomainResult<Option<SecretString>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if caller.tenant_id.as_deref() != Some(HOME_TENANT) {
            return Err(DomainError::TokenAcquisition {
                message: format!("tenant {:?} is not configured", caller.tenant_id),
            });
        }
        let Some(assertion) = caller.assertion.as_ref() else {
            return Ok(None);
        };
        Ok(assertion
            .expose_secret()
            .strip_prefix("assertion-")
            .map(|user| SecretString::from(format!("token-for-{user}"))))
    }
}

/// Directory that puts callers named `member-*` in the authors group.
#[derive(Default)]
pub struct StaticDirectory {
    pub calls: AtomicUsize,
    pub unavailable: bool,
}

impl StaticDirectory {
    pub fn unavailable() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            unavailable: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryClient for StaticDirectory {
    async fn list_memberships(&self, token: &SecretString) -> DomainResult<Vec<GroupMembership>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(DomainError::Directory {
                message: "directory unavailable".to_string(),
            });
        }
        let mut groups = vec![GroupMembership::new("everyone").with_display_name("Everyone")];
        if token.expose_secret().starts_with("token-for-member-") {
            groups.push(GroupMembership::new(AUTHORS_GROUP).with_display_name("Authors"));
        }
        Ok(groups)
    }
}

/// Default config with the authors group as gate.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.authorization.group_id = Some(AUTHORS_GROUP.to_string());
    config
}

/// Opens the configured memory store and seeds it with `teams` (id, name).
pub fn seeded_store(config: &ServerConfig, teams: &[(&str, &str)]) -> Arc<MemoryKeyValueStore> {
    let store = config.storage.open_memory_store().unwrap();
    for (id, name) in teams {
        store
            .upsert(
                &config.storage.table_name,
                TableEntity::new(config.storage.partition_key.as_str(), *id)
                    .with_property("Name", *name)
                    .with_property("ServiceUrl", "https://smba.trafficmanager.net/amer/"),
            )
            .unwrap();
    }
    store
}
