//! Testing utilities for sitekit workspace
//!
//! Shared stores with failure injection, counting renderers, and form and
//! roster fixtures.

#![allow(missing_docs)]

use parking_lot::Mutex;
use sitekit_avatar::{AssetRef, AvatarKey, AvatarRenderer, SvgAvatarRenderer};
use sitekit_capture::{FormData, FormSpec};
use sitekit_select::Catalog;
use sitekit_store::{LocalStore, MemoryStore, Result, StoreError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Memory store with switchable failures and a write log
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: Mutex<Vec<String>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Keys of successful `set`/`remove` calls, in order
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).ok().flatten()
    }

    fn check(&self, flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::disabled(format!("injected {what} failure")))
        } else {
            Ok(())
        }
    }
}

impl LocalStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check(&self.fail_reads, "read")?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check(&self.fail_writes, "write")?;
        self.inner.set(key, value)?;
        self.writes.lock().push(key.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check(&self.fail_writes, "write")?;
        self.inner.remove(key)?;
        self.writes.lock().push(key.to_string());
        Ok(())
    }
}

/// SVG renderer that counts how often it runs
#[derive(Debug, Default)]
pub struct CountingRenderer {
    calls: AtomicUsize,
}

impl CountingRenderer {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AvatarRenderer for CountingRenderer {
    fn render(&self, key: &AvatarKey) -> AssetRef {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SvgAvatarRenderer.render(key)
    }
}

pub fn contact_form() -> FormSpec {
    FormSpec::new("clubContacts", ["Name", "Email", "Subject", "Message"])
        .with_required(["name", "email", "message"])
}

pub fn lodge_form() -> FormSpec {
    FormSpec::new(
        "lodgeBookings",
        ["Owner-name", "Email", "Lodge", "Check-in", "Check-out", "Guests"],
    )
    .with_required(["Owner-name", "email", "lodge"])
}

pub fn review_form() -> FormSpec {
    FormSpec::new(
        "productReviews",
        ["Product", "Rating", "Installed", "Features", "Review", "User-name"],
    )
    .with_required(["product", "rating", "installed"])
    .with_count_key("reviewCount")
}

pub fn amy_submission() -> FormData {
    FormData::from_pairs([
        ("name", "Amy"),
        ("email", "a@x.com"),
        ("subject", ""),
        ("message", "Hi, there"),
    ])
}

pub fn contact_submission(name: &str) -> FormData {
    FormData::from_pairs([
        ("name", name),
        ("email", "fan@example.com"),
        ("message", "Up the club"),
    ])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: &'static str,
    pub position: &'static str,
    pub initials: &'static str,
    pub color: &'static str,
}

fn player(
    name: &'static str,
    position: &'static str,
    initials: &'static str,
    color: &'static str,
) -> Player {
    Player {
        name,
        position,
        initials,
        color,
    }
}

pub fn squad() -> Catalog<u32, Player> {
    Catalog::new([
        (7, player("Tawanda Moyo", "Forward", "TM", "#0b6623")),
        (4, player("Brian Ncube", "Midfield", "BN", "#0a8b4d")),
        (1, player("Peter Mlambo", "Goalkeeper", "PM", "#0e6b3a")),
        (11, player("Samuel Dube", "Defence", "SD", "#0f8a3c")),
        (9, player("Kevin Sibanda", "Forward", "KS", "#127a37")),
    ])
}
