//! Test helpers that assemble a full [`App`] over an in-memory SQLite pool.
//!
//! Handlers and socket tests drive the same composition `main` builds, with
//! a cheap password hasher so registration stays fast.

use std::sync::Arc;

use chrono::Duration;
use jojo_domain::{CreationRules, SpecialArmorPolicy};

use crate::app::{App, Repositories, Services};
use crate::infrastructure::auth::{InMemorySessionStore, Sha256PasswordHasher};
use crate::infrastructure::clock::{SystemClock, SystemRandom};
use crate::infrastructure::ports::RandomPort;
use crate::infrastructure::sqlite::{self, SqliteCharacterRepo, SqliteUserRepo};

const TEST_HASH_ITERATIONS: u32 = 16;

/// App with default rules and the overwrite special armor policy.
pub async fn sqlite_app() -> Arc<App> {
    build(Arc::new(SystemRandom::new()), SpecialArmorPolicy::default()).await
}

pub async fn sqlite_app_with_policy(policy: SpecialArmorPolicy) -> Arc<App> {
    build(Arc::new(SystemRandom::new()), policy).await
}

/// App whose dice come from `random`.
pub async fn sqlite_app_with_random(random: Arc<dyn RandomPort>) -> Arc<App> {
    build(random, SpecialArmorPolicy::default()).await
}

async fn build(random: Arc<dyn RandomPort>, policy: SpecialArmorPolicy) -> Arc<App> {
    let pool = sqlite::connect_in_memory()
        .await
        .expect("in-memory sqlite pool");
    let clock = Arc::new(SystemClock::new());

    let repositories = Repositories {
        user: Arc::new(SqliteUserRepo::new(pool.clone())),
        character: Arc::new(SqliteCharacterRepo::new(pool)),
    };
    let services = Services {
        passwords: Arc::new(Sha256PasswordHasher::new(TEST_HASH_ITERATIONS)),
        sessions: Arc::new(InMemorySessionStore::new(Duration::hours(24), clock.clone())),
        clock,
        random,
    };

    Arc::new(App::new(
        repositories,
        services,
        CreationRules::default(),
        policy,
    ))
}
