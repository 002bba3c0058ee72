//! # Guarded Delete Example
//!
//! This example shows the core soft-delete behavior:
//! - Deleting a record flips it inactive instead of removing it
//! - `force = true` is the escape hatch that really removes it
//! - The schema pass rejects cascade references to activatable entities

use activatable::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub is_active: bool,
}

impl ActivatableRecord for Customer {
    type Id = u32;

    fn entity_name() -> &'static str {
        "customer"
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

type CustomerStore = GuardedStore<Customer, MemoryBackend<Customer>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🛡  Guarded Delete");
    println!("=================");

    // 1. Schema declarations and the startup validation pass
    let mut runtime = ActivationRuntime::new();
    runtime.register_entity::<Customer>()?;
    runtime.declare_relation(
        RelationDecl::new("order", "customer_ref", "customer").on_delete(OnDelete::Protect),
    )?;
    runtime.initialize()?;
    println!("✅ Schema validated: no cascade references to activatable entities");

    // A cascade reference would have aborted startup:
    let mut broken = ActivationRuntime::new();
    broken.register_entity::<Customer>()?;
    broken.declare_relation(RelationDecl::new("order", "customer_ref", "customer"))?;
    match broken.initialize() {
        Err(e) => println!("❌ Cascade schema rejected: {e}"),
        Ok(_) => unreachable!(),
    }

    // 2. Guarded store over the in-memory backend
    let store: CustomerStore = GuardedStore::new(MemoryBackend::new(), Some(runtime.signals()));

    let customer = store
        .create(Customer {
            id: 1,
            name: "Ada".to_string(),
            is_active: true,
        })
        .await?;
    println!("\n📦 Created customer {} (active={})", customer.name, customer.is_active);

    // 3. Soft delete: the record survives, inactive
    let outcome = store.delete(customer.id(), false).await?;
    println!("🔕 delete()          -> {} deactivated, 0 removed", outcome.affected());
    let still_there = store.get_by_id(&1).await?.expect("record survives soft delete");
    println!("   still in storage: {} (active={})", still_there.name, still_there.is_active);

    // 4. Forced delete: the record actually leaves storage
    let outcome = store.delete(&1, true).await?;
    println!("💥 delete(force)     -> {} removed", outcome.affected());
    println!("   retrievable now: {}", store.get_by_id(&1).await?.is_some());

    runtime.shutdown();
    Ok(())
}
