//! Bill splitting engine.
//!
//! The heart of the crate is [`split_bill`], which allocates a bill between
//! the people named on its personal items. [`Bill`] is the editable draft a
//! user builds before splitting and [`BillStore`] keeps drafts on disk.

pub use bill::{Bill, Item, Participant};
pub use date::format_date;
pub use error::EngineError;
pub use money::{Money, TipRate};
pub use split::{
    BillInput, BillItem, BillOutput, PersonShare, RawShare, ResiduePolicy, adjust_amounts,
    person_amount, pre_tip_share, scan_persons, split_bill, split_bill_with, sub_total, tip_for,
};
pub use store::BillStore;

mod bill;
mod date;
mod error;
mod money;
mod split;
mod store;

pub type ResultEngine<T> = Result<T, EngineError>;
