use crate::model::Address;

/// Returns the addresses whose street contains `query`, ignoring case.
/// An empty query keeps every address. The input is never modified.
pub fn filter_by_street<'a>(addresses: &'a [Address], query: &str) -> Vec<&'a Address> {
    if query.is_empty() {
        return addresses.iter().collect();
    }
    let needle = query.to_lowercase();
    addresses
        .iter()
        .filter(|a| a.street.to_lowercase().contains(&needle))
        .collect()
}
