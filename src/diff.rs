use crate::flatten::FlatMessages;

/// Keys present in `reference` but absent from `target`, in reference order
///
/// Keys only found in `target` are not reported, and neither are keys whose
/// target value is outdated: the updater fills gaps, it does not prune.
pub fn missing_keys(reference: &FlatMessages, target: &FlatMessages) -> Vec<String> {
    reference
        .keys()
        .filter(|key| !target.contains_key(key))
        .cloned()
        .collect()
}
