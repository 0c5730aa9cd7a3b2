//! Install-once guard for host controllers.
//!
//! A host page may end up including the same generated payload twice (a
//! template rendered in two places, a tag manager firing twice). Only the
//! first inclusion may install a controller. The registry records installed
//! embed ids for the lifetime of the page.
//!
//! # Contract
//!
//! - [`install`] is called synchronously, before any asynchronous work is
//!   scheduled for the embed. It succeeds exactly once per id.
//! - An [`Installation`] stays registered until [`uninstall`] is called with
//!   its id. Dropping the token does not uninstall: the installed controller
//!   lives as long as the page.
//! - [`uninstall`] is the teardown hook for hosts that remove an embed and
//!   for tests. It makes the next [`install`] of that id succeed again.
//!
//! Two unrelated embeds that happen to share an id are not told apart.

use std::{collections::HashSet, sync::LazyLock};

use framebridge_protocol::EmbedId;
use parking_lot::Mutex;

use crate::HostError;

static INSTALLED: LazyLock<Mutex<InstallRegistry>> =
    LazyLock::new(|| Mutex::new(InstallRegistry::default()));

/// Proof that an embed id was registered by this caller.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Installation {
    embed_id: EmbedId,
}

impl Installation {
    /// The registered id.
    pub fn embed_id(&self) -> &EmbedId {
        &self.embed_id
    }
}

/// A set of installed embed ids.
///
/// The page-wide registry behind [`install`] is one of these; separate
/// instances are useful where a page-wide singleton is not wanted.
#[derive(Debug, Default)]
pub struct InstallRegistry {
    installed: HashSet<EmbedId>,
}

impl InstallRegistry {
    /// Register `embed_id`, failing if it is already registered.
    pub fn install(&mut self, embed_id: &EmbedId) -> Result<Installation, HostError> {
        if !self.installed.insert(embed_id.clone()) {
            return Err(HostError::AlreadyInstalled(embed_id.clone()));
        }

        Ok(Installation {
            embed_id: embed_id.clone(),
        })
    }

    /// Forget `embed_id`. Returns whether it was registered.
    pub fn uninstall(&mut self, embed_id: &EmbedId) -> bool {
        self.installed.remove(embed_id)
    }

    /// Whether `embed_id` is registered.
    pub fn is_installed(&self, embed_id: &EmbedId) -> bool {
        self.installed.contains(embed_id)
    }
}

/// Register `embed_id` in the page-wide registry.
pub fn install(embed_id: &EmbedId) -> Result<Installation, HostError> {
    INSTALLED.lock().install(embed_id)
}

/// Register `embed_id` page-wide and run `start` for it.
///
/// Returns `Ok(None)` without calling `start` when the id is already
/// installed. When `start` fails the id is released again, so a later
/// install can retry.
pub fn install_with<T, E>(
    embed_id: &EmbedId,
    start: impl FnOnce() -> Result<T, E>,
) -> Result<Option<T>, E> {
    if install(embed_id).is_err() {
        return Ok(None);
    }

    start().map(Some).inspect_err(|_| {
        uninstall(embed_id);
    })
}

/// Remove `embed_id` from the page-wide registry.
pub fn uninstall(embed_id: &EmbedId) -> bool {
    INSTALLED.lock().uninstall(embed_id)
}

/// Whether `embed_id` is registered page-wide.
pub fn is_installed(embed_id: &EmbedId) -> bool {
    INSTALLED.lock().is_installed(embed_id)
}
