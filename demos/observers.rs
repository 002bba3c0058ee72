//! # Activation Observers Example
//!
//! This example introduces the signal side of the crate:
//! - Subscribing observers per entity type
//! - One event per logical state-change operation
//! - Coarse vs strict change-detection semantics

use activatable::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscription {
    pub id: u32,
    pub plan: String,
    pub is_active: bool,
}

impl ActivatableRecord for Subscription {
    type Id = u32;

    fn entity_name() -> &'static str {
        "subscription"
    }

    fn id(&self) -> &u32 {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}

type SubscriptionStore = GuardedStore<Subscription, MemoryBackend<Subscription>>;

fn sample(id: u32, plan: &str, is_active: bool) -> Subscription {
    Subscription {
        id,
        plan: plan.to_string(),
        is_active,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("⚡ Activation Observers");
    println!("======================");

    let mut runtime = ActivationRuntime::new();
    runtime.register_entity::<Subscription>()?;
    runtime.initialize()?;

    runtime.signals().subscribe("subscription", |event| {
        println!(
            "   📨 event: {} record(s) -> active={}",
            event.record_count(),
            event.is_active
        );
    });

    let store: SubscriptionStore =
        GuardedStore::new(MemoryBackend::new(), Some(runtime.signals()));

    println!("\n🆕 Creating three subscriptions (no events)...");
    store.create(sample(1, "basic", false)).await?;
    store.create(sample(2, "pro", true)).await?;
    store.create(sample(3, "pro", false)).await?;

    println!("\n▶  activate([1, 2, 3]) — one event covering the whole batch:");
    store.activate(&[1, 2, 3]).await?;

    println!("\n▶  bulk_update(plan) without the active field — silent:");
    let patch = UpdatePatch::new().set("plan", json!("enterprise"))?;
    store.bulk_update(&[1, 2, 3], patch).await?;

    println!("\n▶  deactivate([1, 2]) — coarse: both announced even if unchanged:");
    store.deactivate(&[1, 2]).await?;

    // Strict change detection only announces records that actually flip.
    println!("\n▶  same store with strict change detection:");
    let strict: SubscriptionStore =
        GuardedStore::new(MemoryBackend::new(), Some(runtime.signals()))
            .with_strict_change_detection(true);
    strict.create(sample(1, "basic", false)).await?;
    strict.create(sample(2, "pro", true)).await?;
    println!("   deactivate([1, 2]) announces only the record that changed:");
    strict.deactivate(&[1, 2]).await?;

    println!(
        "\n👥 {} observer(s) registered",
        runtime.signals().observer_count("subscription")
    );
    runtime.shutdown();
    Ok(())
}
