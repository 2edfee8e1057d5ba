//! Editable bill drafts.
//!
//! A [`Bill`] is what a user builds up step by step: participants are added
//! by name and every [`Item`] points at the participants it concerns. Before
//! splitting, the draft is turned into a [`BillInput`] with
//! [`Bill::to_split_input`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BillInput, BillItem, BillOutput, EngineError, Money, ResiduePolicy, ResultEngine, TipRate,
    date, split,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub amount: Money,
    pub is_shared: bool,
    pub participant_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub location: String,
    pub tip: TipRate,
    pub participants: Vec<Participant>,
    pub items: Vec<Item>,
}

impl Default for Bill {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Bill {
    /// Empty draft dated today.
    pub fn new() -> Self {
        Self {
            id: new_id(),
            name: String::new(),
            date: date::today(),
            location: String::new(),
            tip: TipRate::NONE,
            participants: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn update_info(&mut self, name: &str, date: &str, location: &str, tip: TipRate) {
        self.name = name.to_string();
        self.date = date.to_string();
        self.location = location.to_string();
        self.tip = tip;
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn add_participant(&mut self, name: &str) -> ResultEngine<Participant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidItem(
                "participant name must not be empty".to_string(),
            ));
        }
        let participant = Participant {
            id: new_id(),
            name: name.to_string(),
        };
        self.participants.push(participant.clone());
        Ok(participant)
    }

    /// Removes a participant and drops them from every item.
    pub fn remove_participant(&mut self, id: &str) -> ResultEngine<()> {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        if self.participants.len() == before {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        for item in &mut self.items {
            item.participant_ids.retain(|p| p != id);
        }
        Ok(())
    }

    pub fn add_item(
        &mut self,
        name: &str,
        amount: Money,
        is_shared: bool,
        participant_ids: Vec<String>,
    ) -> ResultEngine<Item> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidItem(
                "item name must not be empty".to_string(),
            ));
        }
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "price of \"{name}\" is negative"
            )));
        }
        if participant_ids.is_empty() {
            return Err(EngineError::InvalidItem(format!(
                "item \"{name}\" has no participants"
            )));
        }
        let item = Item {
            id: new_id(),
            name: name.to_string(),
            amount,
            is_shared,
            participant_ids,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn remove_item(&mut self, id: &str) -> ResultEngine<()> {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() == before {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn update_item_participants(
        &mut self,
        item_id: &str,
        participant_ids: Vec<String>,
    ) -> ResultEngine<Item> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| EngineError::KeyNotFound(item_id.to_string()))?;
        item.participant_ids = participant_ids;
        Ok(item.clone())
    }

    /// Converts the draft into allocator input.
    ///
    /// Shared items ignore their participant list. A personal item is owned
    /// by the first of its participants that is still on the bill.
    pub fn to_split_input(&self) -> ResultEngine<BillInput> {
        let items = self
            .items
            .iter()
            .map(|item| -> ResultEngine<BillItem> {
                if item.is_shared {
                    return Ok(BillItem::shared(&item.name, item.amount));
                }
                let owner = item
                    .participant_ids
                    .iter()
                    .find_map(|id| self.participant(id))
                    .ok_or_else(|| {
                        EngineError::InvalidItem(format!(
                            "personal item \"{}\" has no participant on the bill",
                            item.name
                        ))
                    })?;
                Ok(BillItem::personal(&item.name, item.amount, &owner.name))
            })
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(BillInput {
            date: self.date.clone(),
            location: self.location.clone(),
            tip: self.tip,
            items,
        })
    }

    pub fn calculate(&self, policy: ResiduePolicy) -> ResultEngine<BillOutput> {
        split::split_bill_with(&self.to_split_input()?, policy)
    }
}
