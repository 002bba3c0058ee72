//! Entity-relationship declarations and the cascade-delete check
//!
//! An activatable entity must never be hard-deleted behind the guard's back,
//! so cascade on-delete is forbidden on any reference involving one. A
//! cascade reference declared on an activatable entity is the dangerous
//! direction: deleting its target would cascade away the activatable record
//! itself. One pointing at an activatable entity is rejected too, so the
//! flag cannot be smuggled in from either side. The check runs once over the
//! full set of declarations during application initialization, not on the
//! data path.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::traits::ActivatableRecord;

/// On-delete policy of a reference, as declared in the host schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnDelete {
    /// Deleting the target also deletes the referencing record. The common
    /// default, and the one policy the validator rejects for references
    /// involving activatable entities.
    Cascade,
    Restrict,
    Protect,
    SetNull,
    SetDefault,
    DoNothing,
}

/// A foreign-key-like reference from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDecl {
    pub from_entity: String,
    pub field: String,
    pub to_entity: String,
    pub on_delete: OnDelete,
}

impl RelationDecl {
    /// Declare a reference. The on-delete policy defaults to [`OnDelete::Cascade`],
    /// mirroring the schema conventions the validator exists to catch.
    pub fn new(
        from_entity: impl Into<String>,
        field: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        Self {
            from_entity: from_entity.into(),
            field: field.into(),
            to_entity: to_entity.into(),
            on_delete: OnDelete::Cascade,
        }
    }

    pub fn on_delete(mut self, policy: OnDelete) -> Self {
        self.on_delete = policy;
        self
    }
}

/// A relation the validator rejected, identifying the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub entity: String,
    pub field: String,
    pub target: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}.{}' referencing '{}' uses cascade on-delete, which could \
             hard-delete an activatable record; use restrict, protect, set-null, \
             set-default or do-nothing instead",
            self.entity, self.field, self.target
        )
    }
}

/// The full set of registered activatable entities and relation
/// declarations, validated once at startup.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    activatable: BTreeSet<String>,
    relations: Vec<RelationDecl>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a record type as activatable.
    pub fn register_entity<T: ActivatableRecord>(&mut self) {
        self.register_entity_name(T::entity_name());
    }

    /// Mark an entity as activatable by name, for entities whose record type
    /// lives outside this process.
    pub fn register_entity_name(&mut self, entity: impl Into<String>) {
        self.activatable.insert(entity.into());
    }

    pub fn declare_relation(&mut self, relation: RelationDecl) {
        self.relations.push(relation);
    }

    pub fn is_activatable(&self, entity: &str) -> bool {
        self.activatable.contains(entity)
    }

    pub fn activatable_entities(&self) -> impl Iterator<Item = &str> {
        self.activatable.iter().map(String::as_str)
    }

    pub fn relations(&self) -> &[RelationDecl] {
        &self.relations
    }

    /// Check every declared relation against the no-cascade rule.
    ///
    /// A cascade reference is rejected when either side is activatable: one
    /// declared on an activatable entity lets deletion of its target
    /// silently hard-delete the activatable record, and one pointing at an
    /// activatable entity pulls the same default into its own schema.
    /// Returns all violations rather than the first, so startup failures
    /// report the complete set of offending fields at once.
    pub fn validate(&self) -> Result<(), Vec<SchemaViolation>> {
        let violations: Vec<_> = self
            .relations
            .iter()
            .filter(|r| {
                r.on_delete == OnDelete::Cascade
                    && (self.is_activatable(&r.from_entity) || self.is_activatable(&r.to_entity))
            })
            .map(|r| SchemaViolation {
                entity: r.from_entity.clone(),
                field: r.field.clone(),
                target: r.to_entity.clone(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(policy: OnDelete) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register_entity_name("account");
        registry.declare_relation(
            RelationDecl::new("invoice", "account_ref", "account").on_delete(policy),
        );
        registry
    }

    #[test]
    fn test_cascade_to_activatable_entity_is_rejected() {
        let registry = registry_with(OnDelete::Cascade);
        let violations = registry.validate().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].entity, "invoice");
        assert_eq!(violations[0].field, "account_ref");
        assert_eq!(violations[0].target, "account");
    }

    #[test]
    fn test_default_policy_is_cascade() {
        assert_eq!(
            RelationDecl::new("invoice", "account_ref", "account").on_delete,
            OnDelete::Cascade
        );
    }

    #[test]
    fn test_non_cascade_policies_pass() {
        for policy in [
            OnDelete::Restrict,
            OnDelete::Protect,
            OnDelete::SetNull,
            OnDelete::SetDefault,
            OnDelete::DoNothing,
        ] {
            assert!(registry_with(policy).validate().is_ok(), "{policy:?}");
        }
    }

    #[test]
    fn test_cascade_to_non_activatable_entity_passes() {
        let mut registry = SchemaRegistry::new();
        registry.register_entity_name("account");
        registry.declare_relation(RelationDecl::new("invoice", "line_ref", "invoice_line"));
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_cascade_owned_by_activatable_entity_is_rejected() {
        // A cascade reference on the activatable entity itself is the
        // dangerous direction: deleting the target would hard-delete the
        // activatable record.
        let mut registry = SchemaRegistry::new();
        registry.register_entity_name("account");
        registry.declare_relation(RelationDecl::new("account", "group_ref", "group"));

        let violations = registry.validate().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].entity, "account");
        assert_eq!(violations[0].field, "group_ref");
        assert_eq!(violations[0].target, "group");
    }

    #[test]
    fn test_non_cascade_owned_by_activatable_entity_passes() {
        for policy in [OnDelete::SetNull, OnDelete::Protect] {
            let mut registry = SchemaRegistry::new();
            registry.register_entity_name("account");
            registry.declare_relation(
                RelationDecl::new("account", "group_ref", "group").on_delete(policy),
            );
            assert!(registry.validate().is_ok(), "{policy:?}");
        }
    }

    #[test]
    fn test_all_violations_are_reported() {
        let mut registry = SchemaRegistry::new();
        registry.register_entity_name("account");
        registry.register_entity_name("profile");
        registry.declare_relation(RelationDecl::new("invoice", "account_ref", "account"));
        registry.declare_relation(RelationDecl::new("session", "profile_ref", "profile"));
        registry.declare_relation(
            RelationDecl::new("audit", "account_ref", "account").on_delete(OnDelete::Protect),
        );

        let violations = registry.validate().unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_violation_display_names_the_field() {
        let violation = SchemaViolation {
            entity: "invoice".into(),
            field: "account_ref".into(),
            target: "account".into(),
        };
        let message = violation.to_string();
        assert!(message.contains("invoice.account_ref"));
        assert!(message.contains("account"));
    }
}
