//! Domain secondary index
//!
//! Maps an extracted domain to the ids of member tabs on that domain, in
//! insertion order. The index never owns tabs; the group's membership
//! sequence is the single owner, and the index holds ids only. Buckets are
//! pruned when their last entry is removed so heavy churn cannot grow the
//! key set without bound.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct DomainIndex {
    buckets: HashMap<String, Vec<String>>,
}

impl DomainIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a tab under a domain. Empty domains are never indexed.
    pub fn insert(&mut self, domain: &str, tab_id: &str) {
        if domain.is_empty() {
            return;
        }
        self.buckets
            .entry(domain.to_string())
            .or_default()
            .push(tab_id.to_string());
    }

    /// Remove a tab from a domain's bucket, pruning the bucket if it
    /// becomes empty.
    pub fn remove(&mut self, domain: &str, tab_id: &str) {
        if domain.is_empty() {
            return;
        }
        if let Some(bucket) = self.buckets.get_mut(domain) {
            bucket.retain(|id| id != tab_id);
            if bucket.is_empty() {
                self.buckets.remove(domain);
            }
        }
    }

    /// Move a tab between domain buckets after its URL changed.
    pub fn reindex(&mut self, old_domain: &str, new_domain: &str, tab_id: &str) {
        if old_domain == new_domain {
            return;
        }
        self.remove(old_domain, tab_id);
        self.insert(new_domain, tab_id);
    }

    /// Tab ids indexed under a domain, insertion order. Empty for unknown
    /// domains.
    pub fn get(&self, domain: &str) -> &[String] {
        self.buckets.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn domains(&self) -> impl Iterator<Item = (&str, usize)> {
        self.buckets
            .iter()
            .map(|(domain, bucket)| (domain.as_str(), bucket.len()))
    }

    pub fn domain_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
