//! Base-contract rule shared by package creation and bundle export.
//!
//! An item carrying the contract tag must either hold a base contract itself or
//! reference another item that does. The lookup is a single hop; references
//! are never followed transitively.

use crate::domain::Item;
use crate::error::ValidationError;

/// Check every selected index, collecting all failures as 1-based numbers in
/// selection order.
///
/// Indices that no longer resolve to an item are treated as absent and skipped.
pub fn validate_selection(
    items: &[Item],
    selected: &[usize],
    contract_tag: &str,
) -> Result<(), ValidationError> {
    let failing: Vec<usize> = selected
        .iter()
        .copied()
        .filter(|&index| match items.get(index) {
            Some(item) => !satisfies_contract_rule(items, item, contract_tag),
            None => {
                tracing::debug!("Selected index {} does not resolve; skipping", index + 1);
                false
            }
        })
        .map(|index| index + 1)
        .collect();

    if failing.is_empty() {
        Ok(())
    } else {
        tracing::debug!("Base contract rule failed for items {:?}", failing);
        Err(ValidationError { tag: contract_tag.to_string(), failing })
    }
}

/// Own flag first, then the referenced item's flag.
pub fn satisfies_contract_rule(items: &[Item], item: &Item, contract_tag: &str) -> bool {
    if !item.has_tag(contract_tag) || item.has_base_contract {
        return true;
    }
    item.base_contract_ref
        .and_then(|target| items.get(target))
        .is_some_and(|referenced| referenced.has_base_contract)
}
