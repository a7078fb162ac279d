use super::tree::GroupedTransactions;
use crate::config::{validate_min_support, Tuning};
use crate::error::Result;
use crate::fp::collections::{AssociativeMap, DynamicSequence, ImmutableKey};
use crate::fp::Item;
use tracing::debug;

/// Filters, orders and groups raw transactions with the default tuning.
pub fn preprocess<I, T>(transactions: &[T], min_support: usize) -> Result<GroupedTransactions<I>>
where
    I: Item,
    T: AsRef<[I]>,
{
    preprocess_with(transactions, min_support, &Tuning::default())
}

/// Filters, orders and groups raw transactions.
///
/// Items seen in fewer than `min_support` transactions are dropped. The
/// survivors of each transaction are ordered by descending global frequency,
/// ties by ascending item order, and repeated items collapse to one. Equal
/// sequences are merged into one key whose value counts them; transactions
/// left empty are discarded.
pub fn preprocess_with<I, T>(
    transactions: &[T],
    min_support: usize,
    tuning: &Tuning,
) -> Result<GroupedTransactions<I>>
where
    I: Item,
    T: AsRef<[I]>,
{
    validate_min_support(min_support)?;
    tuning.validate()?;

    let frequent = frequent_items(transactions, min_support, tuning)?;
    let mut grouped = GroupedTransactions::with_tuning(tuning)?;

    for transaction in transactions {
        let mut filtered = DynamicSequence::with_tuning(tuning)?;
        for item in transaction.as_ref() {
            if let Some(&count) = frequent.get(item) {
                filtered.push((item.clone(), count));
            }
        }
        if filtered.is_empty() {
            continue;
        }

        filtered.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)));

        let mut ordered = DynamicSequence::with_tuning(tuning)?;
        let mut previous: Option<&I> = None;
        for (item, _) in filtered.iter() {
            if previous != Some(item) {
                ordered.push(item.clone());
            }
            previous = Some(item);
        }

        *grouped.get_or_insert_with(ImmutableKey::from_sequence(ordered), || 0)? += 1;
    }

    debug!(
        transactions = transactions.len(),
        frequent_items = frequent.len(),
        groups = grouped.len(),
        min_support,
        "preprocessed transactions"
    );
    Ok(grouped)
}

/// Per-item transaction counts, restricted to items reaching `min_support`.
fn frequent_items<I, T>(
    transactions: &[T],
    min_support: usize,
    tuning: &Tuning,
) -> Result<AssociativeMap<I, usize>>
where
    I: Item,
    T: AsRef<[I]>,
{
    let mut counts: AssociativeMap<I, usize> = AssociativeMap::with_tuning(tuning)?;
    for transaction in transactions {
        let mut distinct: Vec<&I> = transaction.as_ref().iter().collect();
        distinct.sort_unstable();
        distinct.dedup();
        for item in distinct {
            *counts.get_or_insert_with(item.clone(), || 0)? += 1;
        }
    }

    let mut frequent = AssociativeMap::with_tuning(tuning)?;
    for (item, count) in counts {
        if count >= min_support {
            frequent.put(item, count);
        }
    }
    Ok(frequent)
}
