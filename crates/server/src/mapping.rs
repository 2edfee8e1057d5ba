//! Conversions between wire types and engine types.

use api_types::{bill as api_bill, split as api_split};
use engine::{EngineError, Money, ResultEngine, TipRate};

pub fn bill_input(payload: api_split::BillInput) -> ResultEngine<engine::BillInput> {
    let tip = TipRate::from_percent(payload.tip_percentage)?;
    let items = payload
        .items
        .into_iter()
        .map(bill_item)
        .collect::<ResultEngine<Vec<_>>>()?;

    Ok(engine::BillInput {
        date: payload.date,
        location: payload.location,
        tip,
        items,
    })
}

fn bill_item(item: api_split::BillItem) -> ResultEngine<engine::BillItem> {
    let price = Money::from_major(item.price)?;
    if item.is_shared {
        return Ok(engine::BillItem::shared(item.name, price));
    }
    match item.person {
        Some(owner) => Ok(engine::BillItem::personal(item.name, price, owner)),
        None => Err(EngineError::InvalidItem(format!(
            "personal item \"{}\" has no person",
            item.name
        ))),
    }
}

pub fn bill_output(output: engine::BillOutput) -> api_split::BillOutput {
    api_split::BillOutput {
        date: output.date,
        location: output.location,
        sub_total: output.sub_total.to_major(),
        tip: output.tip.to_major(),
        total_amount: output.total_amount.to_major(),
        items: output
            .items
            .into_iter()
            .map(|share| api_split::PersonItem {
                name: share.name,
                amount: share.amount.to_major(),
            })
            .collect(),
    }
}

pub fn participant(participant: &engine::Participant) -> api_bill::Participant {
    api_bill::Participant {
        id: participant.id.clone(),
        name: participant.name.clone(),
    }
}

pub fn item(item: &engine::Item) -> api_bill::Item {
    api_bill::Item {
        id: item.id.clone(),
        name: item.name.clone(),
        amount: item.amount.to_major(),
        is_shared: item.is_shared,
        participant_ids: item.participant_ids.clone(),
    }
}

pub fn bill(bill: &engine::Bill) -> api_bill::Bill {
    api_bill::Bill {
        id: bill.id.clone(),
        name: bill.name.clone(),
        date: bill.date.clone(),
        location: bill.location.clone(),
        tip_percentage: bill.tip.as_percent(),
        participants: bill.participants.iter().map(participant).collect(),
        items: bill.items.iter().map(item).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: f64, person: Option<&str>) -> api_split::BillItem {
        api_split::BillItem {
            name: name.to_string(),
            price,
            is_shared: person.is_none(),
            person: person.map(str::to_string),
        }
    }

    #[test]
    fn converts_prices_and_tip() {
        let input = bill_input(api_split::BillInput {
            date: "2024-03-21".to_string(),
            location: "Cafe".to_string(),
            tip_percentage: 12.5,
            items: vec![item("Pizza", 20.0, None), item("Tea", 3.1, Some("Bob"))],
        })
        .unwrap();

        assert_eq!(input.tip.basis_points(), 1250);
        assert_eq!(
            input.items,
            vec![
                engine::BillItem::shared("Pizza", Money::new(2000)),
                engine::BillItem::personal("Tea", Money::new(310), "Bob"),
            ]
        );
    }

    #[test]
    fn personal_item_needs_person() {
        let mut tea = item("Tea", 3.0, None);
        tea.is_shared = false;
        let err = bill_input(api_split::BillInput {
            date: "2024-03-21".to_string(),
            location: "Cafe".to_string(),
            tip_percentage: 0.0,
            items: vec![tea],
        })
        .unwrap_err();

        assert!(matches!(err, EngineError::InvalidItem(_)));
    }

    #[test]
    fn output_uses_major_units() {
        let output = bill_output(engine::BillOutput {
            date: "2024年3月21日".to_string(),
            location: "Cafe".to_string(),
            sub_total: Money::new(2800),
            tip: Money::new(280),
            total_amount: Money::new(3080),
            items: vec![engine::PersonShare {
                name: "Alice".to_string(),
                amount: Money::new(1650),
            }],
        });

        assert_eq!(output.sub_total, 28.0);
        assert_eq!(output.tip, 2.8);
        assert_eq!(output.total_amount, 30.8);
        assert_eq!(output.items[0].amount, 16.5);
    }
}
