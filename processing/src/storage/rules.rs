use std::sync::Arc;
use tracing::info;

use super::{KeyValueStore, RULES_KEY, load_or_default, persist};
use crate::{error::ShieldError, model::Rule, rules::RuleSet};

/// The persisted rule collection. Every mutation writes the full set back.
#[derive(Clone)]
pub struct RuleStorage {
    store: Arc<dyn KeyValueStore>,
}

impl RuleStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored rules, or the built-in defaults when nothing usable is stored.
    pub fn get_all(&self) -> RuleSet {
        load_or_default(self.store.as_ref(), RULES_KEY, RuleSet::defaults)
    }

    pub fn save(&self, rules: &RuleSet) -> Result<(), ShieldError> {
        persist(self.store.as_ref(), RULES_KEY, rules)?;
        Ok(())
    }

    pub fn toggle(&self, id: &str) -> Result<Option<Rule>, ShieldError> {
        self.mutate(id, |rules| rules.toggle(id).cloned())
    }

    pub fn update_weight(&self, id: &str, weight: u32) -> Result<Option<Rule>, ShieldError> {
        self.mutate(id, |rules| rules.update_weight(id, weight).cloned())
    }

    pub fn add(&self, rule: Rule) -> Result<Rule, ShieldError> {
        let mut rules = self.get_all();
        let added = rules.add(rule)?.clone();
        self.save(&rules)?;
        info!(rule_id = %added.id, "Rule added");
        Ok(added)
    }

    fn mutate<F>(&self, id: &str, change: F) -> Result<Option<Rule>, ShieldError>
    where
        F: FnOnce(&mut RuleSet) -> Option<Rule>,
    {
        let mut rules = self.get_all();
        let Some(updated) = change(&mut rules) else {
            return Ok(None);
        };
        self.save(&rules)?;
        info!(rule_id = %id, enabled = updated.enabled, weight = updated.weight, "Rule updated");
        Ok(Some(updated))
    }
}
