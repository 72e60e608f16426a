//! Subtotal/tax/total aggregation.
//!
//! Aggregation is exact decimal arithmetic; nothing is rounded here. Rounding to
//! two decimals is a presentation concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::line_item::LineItem;

/// Invoice totals. Only ever produced together by [`Totals::compute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    subtotal: Decimal,
    tax_amount: Decimal,
    total: Decimal,
}

impl Totals {
    /// `subtotal = Σ amount`, `tax = subtotal * tax_rate / 100`,
    /// `total = subtotal + tax`.
    pub fn compute<'a>(items: impl IntoIterator<Item = &'a LineItem>, tax_rate: Decimal) -> Self {
        let subtotal = items
            .into_iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.amount()));
        let tax_amount = subtotal.saturating_mul(tax_rate) / Decimal::ONE_HUNDRED;
        let total = subtotal.saturating_add(tax_amount);

        Self {
            subtotal,
            tax_amount,
            total,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax_amount(&self) -> Decimal {
        self.tax_amount
    }

    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Output of [`recompute`]: the items with fresh amounts plus their totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recomputed {
    pub items: Vec<LineItem>,
    pub totals: Totals,
}

/// Re-derive every item amount and the invoice totals.
///
/// Item order is preserved.
pub fn recompute(mut items: Vec<LineItem>, tax_rate: Decimal) -> Recomputed {
    for item in &mut items {
        item.refresh_amount();
    }
    let totals = Totals::compute(&items, tax_rate);
    Recomputed { items, totals }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn design_work_with_gst() {
        let out = recompute(vec![LineItem::from_input("Design", "2", "500")], dec(18));

        assert_eq!(out.items[0].amount(), dec(1000));
        assert_eq!(out.totals.subtotal(), dec(1000));
        assert_eq!(out.totals.tax_amount(), dec(180));
        assert_eq!(out.totals.total(), dec(1180));
    }

    #[test]
    fn empty_item_list_totals_zero() {
        let out = recompute(Vec::new(), dec(18));
        assert_eq!(out.totals, Totals::default());
    }

    #[test]
    fn zero_tax_rate_total_equals_subtotal() {
        let out = recompute(
            vec![
                LineItem::from_input("A", "1", "99.99"),
                LineItem::from_input("B", "3", "0.01"),
            ],
            Decimal::ZERO,
        );
        assert_eq!(out.totals.subtotal(), Decimal::new(10002, 2));
        assert_eq!(out.totals.tax_amount(), Decimal::ZERO);
        assert_eq!(out.totals.total(), Decimal::new(10002, 2));
    }

    #[test]
    fn repeating_decimal_tax_keeps_full_precision() {
        // 100 * 33.333% = 33.333, no rounding applied internally.
        let out = recompute(
            vec![LineItem::from_input("Retainer", "1", "100")],
            Decimal::new(33333, 3),
        );
        assert_eq!(out.totals.tax_amount(), Decimal::new(33333, 3));
        assert_eq!(out.totals.total(), Decimal::new(133333, 3));
    }

    #[test]
    fn non_numeric_inputs_never_poison_the_total() {
        let items = vec![
            LineItem::from_input("Valid", "2", "50"),
            LineItem::from_input("Broken", "x", "y"),
        ];
        let tax_rate = crate::numeric::coerce_decimal("eighteen");
        let out = recompute(items, tax_rate);
        assert_eq!(out.totals.subtotal(), dec(100));
        assert_eq!(out.totals.tax_amount(), Decimal::ZERO);
        assert_eq!(out.totals.total(), dec(100));
    }

    #[test]
    fn order_is_preserved() {
        let out = recompute(
            vec![
                LineItem::from_input("first", "1", "1"),
                LineItem::from_input("second", "1", "2"),
            ],
            Decimal::ZERO,
        );
        let names: Vec<_> = out.items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn money() -> impl Strategy<Value = Decimal> {
            (0i64..1_000_000, 0u32..4).prop_map(|(n, scale)| Decimal::new(n, scale))
        }

        fn items() -> impl Strategy<Value = Vec<LineItem>> {
            prop::collection::vec(
                (money(), money()).prop_map(|(q, r)| LineItem::new("row", q, r)),
                0..20,
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: subtotal is the sum of quantity * rate over all rows.
            #[test]
            fn subtotal_is_sum_of_row_products(items in items(), tax in 0i64..=100) {
                let expected: Decimal = items.iter().map(|i| i.quantity() * i.rate()).sum();
                let out = recompute(items, Decimal::from(tax));
                prop_assert_eq!(out.totals.subtotal(), expected);
            }

            /// Property: tax and total identities hold for any rate in range.
            #[test]
            fn tax_and_total_identities(items in items(), tax in (0i64..=10_000).prop_map(|n| Decimal::new(n, 2))) {
                let out = recompute(items, tax);
                let t = out.totals;
                prop_assert_eq!(t.tax_amount(), t.subtotal() * tax / Decimal::ONE_HUNDRED);
                prop_assert_eq!(t.total(), t.subtotal() + t.tax_amount());
            }

            /// Property: row order never changes the totals.
            #[test]
            fn totals_ignore_row_order(items in items(), tax in 0i64..=100) {
                let mut reversed = items.clone();
                reversed.reverse();
                let a = recompute(items, Decimal::from(tax));
                let b = recompute(reversed, Decimal::from(tax));
                prop_assert_eq!(a.totals, b.totals);
            }

            /// Property: every returned row satisfies amount == quantity * rate.
            #[test]
            fn every_amount_is_derived(items in items()) {
                let out = recompute(items, Decimal::ZERO);
                for item in &out.items {
                    prop_assert_eq!(item.amount(), item.quantity() * item.rate());
                }
            }
        }
    }
}
