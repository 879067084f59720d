//! Shareable metadata for `retrial_core::vocab` registries.
//!
//! ## Notes
//! - These types are `Copy` so registries can live in `const` tables.
//! - Metadata is meant for tooling, docs and diagnostics; the engine itself only uses the ids.

/// Shared metadata shape for registry-first vocabulary items.
///
/// - stable identity (`id`)
/// - accepted spellings (`canonical` + `aliases`)
/// - documentation (`description`)
#[derive(Debug, Clone, Copy)]
pub struct VocabInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl<Id: Copy + PartialEq> VocabInfo<Id> {
    /// Check whether `name` is the canonical spelling or one of the aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.canonical == name || self.aliases.contains(&name)
    }
}

/// Resolve a spelling against a registry table, canonical spellings first.
pub(crate) fn lookup<Id: Copy + PartialEq>(table: &[VocabInfo<Id>], name: &str) -> Option<Id> {
    if let Some(info) = table.iter().find(|d| d.canonical == name) {
        return Some(info.id);
    }
    table.iter().find(|d| d.aliases.contains(&name)).map(|d| d.id)
}

/// Find the metadata entry for an id.
///
/// Every id enum in this crate has exactly one entry in its table, which the guardrail tests enforce.
pub(crate) fn entry<Id: Copy + PartialEq>(table: &'static [VocabInfo<Id>], id: Id) -> &'static VocabInfo<Id> {
    table
        .iter()
        .find(|d| d.id == id)
        .expect("INVARIANT: every vocabulary id has a table entry")
}
