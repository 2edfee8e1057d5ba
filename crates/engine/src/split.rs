//! Bill allocation.
//!
//! [`split_bill`] turns a [`BillInput`] into a [`BillOutput`]:
//!
//! 1. the subtotal is the plain sum of every item price;
//! 2. the bill tip is `subtotal * pct / 100`, rounded to a tenth;
//! 3. every distinct owner of a personal item gets an even slice of each
//!    shared item plus their own personal items, grows it by their own tip and
//!    rounds it to a tenth;
//! 4. the residue between the rounded total and the sum of the rounded shares
//!    is handed out according to the [`ResiduePolicy`].
//!
//! Shares always add up to the total exactly, or the call fails with
//! [`EngineError::Reconciliation`].

use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine, TipRate, date};

/// A bill line item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BillItem {
    /// Split evenly among every distinct personal-item owner on the bill.
    Shared { name: String, price: Money },
    /// Charged entirely to `owner`.
    Personal {
        name: String,
        price: Money,
        owner: String,
    },
}

impl BillItem {
    pub fn shared(name: impl Into<String>, price: Money) -> Self {
        Self::Shared {
            name: name.into(),
            price,
        }
    }

    pub fn personal(name: impl Into<String>, price: Money, owner: impl Into<String>) -> Self {
        Self::Personal {
            name: name.into(),
            price,
            owner: owner.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Shared { name, .. } | Self::Personal { name, .. } => name,
        }
    }

    pub fn price(&self) -> Money {
        match self {
            Self::Shared { price, .. } | Self::Personal { price, .. } => *price,
        }
    }

    /// Owner of a personal item, `None` for shared items.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Shared { .. } => None,
            Self::Personal { owner, .. } => Some(owner),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillInput {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub location: String,
    pub tip: TipRate,
    pub items: Vec<BillItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonShare {
    pub name: String,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillOutput {
    /// Rendered by [`format_date`](crate::format_date).
    pub date: String,
    pub location: String,
    pub sub_total: Money,
    pub tip: Money,
    pub total_amount: Money,
    /// One entry per distinct owner, in first-seen order.
    pub items: Vec<PersonShare>,
}

/// Who absorbs the rounding residue during reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResiduePolicy {
    /// The whole residue goes to the first owner found on the bill.
    #[default]
    FirstPerson,
    /// The residue is handed out one tenth at a time, cycling through owners
    /// from the first one.
    RoundRobin,
}

/// Exact pre-tip share of one person, `scaled / people` cents.
///
/// Kept as a fraction so the even split of shared items is never rounded
/// before the tip is applied.
#[derive(Clone, Copy, Debug)]
pub struct RawShare {
    scaled: i128,
    people: i128,
}

impl RawShare {
    /// `people` must be positive.
    pub fn new(scaled: i128, people: i128) -> Self {
        Self { scaled, people }
    }

    /// Approximate value in major units.
    pub fn as_major(self) -> f64 {
        self.scaled as f64 / self.people as f64 / 100.0
    }

    /// Applies `tip` and rounds to the nearest tenth.
    pub fn with_tip(self, tip: TipRate) -> ResultEngine<Money> {
        tip.apply_rounded(self.scaled, self.people)
    }
}

impl PartialEq for RawShare {
    fn eq(&self, other: &Self) -> bool {
        self.scaled * other.people == other.scaled * self.people
    }
}

/// Splits `input` with the default [`ResiduePolicy::FirstPerson`] policy.
pub fn split_bill(input: &BillInput) -> ResultEngine<BillOutput> {
    split_bill_with(input, ResiduePolicy::default())
}

pub fn split_bill_with(input: &BillInput, policy: ResiduePolicy) -> ResultEngine<BillOutput> {
    validate(input)?;

    let date = date::format_date(&input.date)?;
    let sub_total = sub_total(&input.items)?;
    let tip = tip_for(sub_total, input.tip)?;
    let total_amount = sub_total
        .checked_add(tip)
        .and_then(Money::checked_round_tenth)
        .ok_or_else(|| EngineError::InvalidAmount("bill total too large".to_string()))?;

    let mut items = person_shares(&input.items, input.tip)?;
    adjust_amounts(total_amount, &mut items, policy)?;

    Ok(BillOutput {
        date,
        location: input.location.clone(),
        sub_total,
        tip,
        total_amount,
        items,
    })
}

fn validate(input: &BillInput) -> ResultEngine<()> {
    if input.tip.is_negative() {
        return Err(EngineError::InvalidTip(input.tip.to_string()));
    }
    for item in &input.items {
        if item.price().is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "price of \"{}\" is negative",
                item.name()
            )));
        }
        if let Some(owner) = item.owner()
            && owner.trim().is_empty()
        {
            return Err(EngineError::InvalidItem(format!(
                "personal item \"{}\" has no owner",
                item.name()
            )));
        }
    }
    Ok(())
}

/// Sum of every item price, shared and personal. Not rounded.
pub fn sub_total(items: &[BillItem]) -> ResultEngine<Money> {
    items.iter().try_fold(Money::ZERO, |acc, item| {
        acc.checked_add(item.price())
            .ok_or_else(|| EngineError::InvalidAmount("subtotal too large".to_string()))
    })
}

/// Bill-level tip, rounded to the nearest tenth.
pub fn tip_for(sub_total: Money, tip: TipRate) -> ResultEngine<Money> {
    tip.tip_on(sub_total)
}

/// Distinct personal-item owners in first-seen order.
pub fn scan_persons(items: &[BillItem]) -> Vec<String> {
    let mut persons: Vec<String> = Vec::new();
    for owner in items.iter().filter_map(BillItem::owner) {
        if !persons.iter().any(|p| p == owner) {
            persons.push(owner.to_string());
        }
    }
    persons
}

/// Share of `name` before the tip: an even `1 / people` slice of every shared
/// item plus the full price of each item `name` owns.
pub fn pre_tip_share(items: &[BillItem], name: &str, people: usize) -> RawShare {
    let people = people.max(1) as i128;
    let scaled = items.iter().fold(0i128, |acc, item| match item {
        BillItem::Shared { price, .. } => acc + i128::from(price.cents()),
        BillItem::Personal { price, owner, .. } if owner == name => {
            acc + i128::from(price.cents()) * people
        }
        BillItem::Personal { .. } => acc,
    });
    RawShare::new(scaled, people)
}

/// Amount owed by `name`: the pre-tip share grown by that person's own tip,
/// rounded to the nearest tenth.
pub fn person_amount(
    items: &[BillItem],
    tip: TipRate,
    name: &str,
    people: usize,
) -> ResultEngine<Money> {
    pre_tip_share(items, name, people).with_tip(tip)
}

fn person_shares(items: &[BillItem], tip: TipRate) -> ResultEngine<Vec<PersonShare>> {
    let names = scan_persons(items);
    let people = names.len();
    names
        .into_iter()
        .map(|name| {
            Ok(PersonShare {
                amount: person_amount(items, tip, &name, people)?,
                name,
            })
        })
        .collect()
}

/// Moves the rounding residue into `shares` so they add up to `total`.
///
/// An empty `shares` list has nobody to absorb a residue and is left as is.
pub fn adjust_amounts(
    total: Money,
    shares: &mut [PersonShare],
    policy: ResiduePolicy,
) -> ResultEngine<()> {
    if shares.is_empty() {
        return Ok(());
    }

    let sum: Money = shares.iter().map(|s| s.amount).sum();
    let difference = (total - sum).round_tenth();
    if !difference.is_zero() {
        tracing::debug!(%difference, ?policy, "reconciling bill residue");
        match policy {
            ResiduePolicy::FirstPerson => {
                let first = &mut shares[0];
                first.amount = (first.amount + difference).round_tenth();
            }
            ResiduePolicy::RoundRobin => {
                let step = if difference.is_negative() {
                    Money::new(-10)
                } else {
                    Money::new(10)
                };
                let steps = (difference.cents() / 10).unsigned_abs() as usize;
                let len = shares.len();
                for index in (0..len).cycle().take(steps) {
                    shares[index].amount += step;
                }
            }
        }
    }

    for share in shares.iter_mut() {
        share.amount = share.amount.round_tenth();
    }

    let sum: Money = shares.iter().map(|s| s.amount).sum();
    if sum.round_tenth() != total {
        return Err(EngineError::Reconciliation { total, sum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(cents: i64) -> Money {
        Money::new(cents)
    }

    fn share(name: &str, cents: i64) -> PersonShare {
        PersonShare {
            name: name.to_string(),
            amount: m(cents),
        }
    }

    #[test]
    fn scan_keeps_first_seen_order_without_duplicates() {
        let items = vec![
            BillItem::personal("Tea", m(300), "Bob"),
            BillItem::shared("Pizza", m(2000)),
            BillItem::personal("Coffee", m(500), "Alice"),
            BillItem::personal("Cake", m(400), "Bob"),
        ];
        assert_eq!(scan_persons(&items), vec!["Bob", "Alice"]);
    }

    #[test]
    fn scan_ignores_shared_items() {
        let items = vec![BillItem::shared("Pizza", m(2000))];
        assert!(scan_persons(&items).is_empty());
    }

    #[test]
    fn sub_total_sums_every_item() {
        let items = vec![
            BillItem::shared("Pizza", m(2000)),
            BillItem::personal("Coffee", m(505), "Alice"),
        ];
        assert_eq!(sub_total(&items).unwrap(), m(2505));
        assert_eq!(sub_total(&[]).unwrap(), Money::ZERO);
    }

    #[test]
    fn sub_total_reports_overflow() {
        let items = vec![
            BillItem::shared("A", m(i64::MAX)),
            BillItem::shared("B", m(1)),
        ];
        assert!(matches!(sub_total(&items), Err(EngineError::InvalidAmount(_))));
    }

    #[test]
    fn huge_tip_is_rejected_instead_of_wrapping() {
        let tip = TipRate::from_percent(1e15).unwrap();
        let items = vec![
            BillItem::shared("Pizza", m(100_000_000)),
            BillItem::personal("Tea", m(300), "Bob"),
        ];
        assert!(matches!(
            tip_for(m(100_000_000), tip),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            person_amount(&items, tip, "Bob", 1),
            Err(EngineError::InvalidAmount(_))
        ));

        let input = BillInput {
            date: "2024-03-21".to_string(),
            location: "Cafe".to_string(),
            tip,
            items,
        };
        assert!(matches!(
            split_bill(&input),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn person_amount_applies_own_tip() {
        let items = vec![
            BillItem::shared("Pizza", m(2000)),
            BillItem::personal("Coffee", m(500), "Alice"),
            BillItem::personal("Tea", m(300), "Bob"),
        ];
        let tip = TipRate::from_percent(10.0).unwrap();
        assert_eq!(person_amount(&items, tip, "Alice", 2).unwrap(), m(1650));
        assert_eq!(person_amount(&items, tip, "Bob", 2).unwrap(), m(1430));
    }

    #[test]
    fn person_amount_rounds_half_away_from_zero() {
        // 10.00 / 4 = 2.50 before tip, 2.50 * 1.1 = 2.75 -> 2.8
        let items = vec![
            BillItem::shared("Bread", m(1000)),
            BillItem::personal("A", m(0), "a"),
            BillItem::personal("B", m(0), "b"),
            BillItem::personal("C", m(0), "c"),
            BillItem::personal("D", m(0), "d"),
        ];
        let tip = TipRate::from_percent(10.0).unwrap();
        assert_eq!(person_amount(&items, tip, "a", 4).unwrap(), m(280));
    }

    #[test]
    fn adjust_is_noop_when_balanced() {
        let mut shares = vec![share("Alice", 1650), share("Bob", 1430)];
        adjust_amounts(m(3080), &mut shares, ResiduePolicy::FirstPerson).unwrap();
        assert_eq!(shares, vec![share("Alice", 1650), share("Bob", 1430)]);
    }

    #[test]
    fn adjust_gives_residue_to_first_person() {
        let mut shares = vec![share("Alice", 330), share("Bob", 330), share("Carol", 330)];
        adjust_amounts(m(1000), &mut shares, ResiduePolicy::FirstPerson).unwrap();
        assert_eq!(
            shares,
            vec![share("Alice", 340), share("Bob", 330), share("Carol", 330)]
        );
    }

    #[test]
    fn adjust_takes_negative_residue_from_first_person() {
        let mut shares = vec![share("Alice", 340), share("Bob", 340), share("Carol", 340)];
        adjust_amounts(m(1000), &mut shares, ResiduePolicy::FirstPerson).unwrap();
        assert_eq!(
            shares,
            vec![share("Alice", 320), share("Bob", 340), share("Carol", 340)]
        );
    }

    #[test]
    fn adjust_round_robin_spreads_residue() {
        let mut shares = vec![share("Alice", 330), share("Bob", 330), share("Carol", 330)];
        adjust_amounts(m(1020), &mut shares, ResiduePolicy::RoundRobin).unwrap();
        assert_eq!(
            shares,
            vec![share("Alice", 340), share("Bob", 340), share("Carol", 330)]
        );
    }

    #[test]
    fn adjust_round_robin_wraps_around() {
        let mut shares = vec![share("Alice", 100), share("Bob", 100)];
        adjust_amounts(m(170), &mut shares, ResiduePolicy::RoundRobin).unwrap();
        assert_eq!(shares, vec![share("Alice", 80), share("Bob", 90)]);
    }

    #[test]
    fn adjust_without_people_is_noop() {
        let mut shares: Vec<PersonShare> = Vec::new();
        adjust_amounts(m(1230), &mut shares, ResiduePolicy::FirstPerson).unwrap();
        assert!(shares.is_empty());
    }

    #[test]
    fn adjust_fails_on_unreachable_total() {
        // A total that is not a whole number of tenths can never be matched.
        let mut shares = vec![share("Alice", 100)];
        let err = adjust_amounts(m(105), &mut shares, ResiduePolicy::FirstPerson).unwrap_err();
        assert!(matches!(err, EngineError::Reconciliation { .. }));
    }

    #[test]
    fn validate_rejects_negative_price() {
        let input = BillInput {
            date: "2024-03-21".to_string(),
            location: "Cafe".to_string(),
            tip: TipRate::NONE,
            items: vec![BillItem::shared("Refund", m(-100))],
        };
        assert!(matches!(
            split_bill(&input),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn validate_rejects_blank_owner() {
        let input = BillInput {
            date: "2024-03-21".to_string(),
            location: "Cafe".to_string(),
            tip: TipRate::NONE,
            items: vec![BillItem::personal("Coffee", m(500), "  ")],
        };
        assert!(matches!(split_bill(&input), Err(EngineError::InvalidItem(_))));
    }

    #[test]
    fn validate_rejects_negative_tip() {
        let input = BillInput {
            date: "2024-03-21".to_string(),
            location: "Cafe".to_string(),
            tip: TipRate::from_basis_points(-500),
            items: vec![],
        };
        assert!(matches!(split_bill(&input), Err(EngineError::InvalidTip(_))));
    }
}
