use serde::{Deserialize, Serialize};

/// Generic acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub mod split {
    use super::*;

    /// One line of a bill sent for splitting.
    ///
    /// `person` is required when `is_shared` is `false`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillItem {
        pub name: String,
        pub price: f64,
        pub is_shared: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub person: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillInput {
        /// `YYYY-MM-DD`.
        pub date: String,
        pub location: String,
        pub tip_percentage: f64,
        pub items: Vec<BillItem>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PersonItem {
        pub name: String,
        pub amount: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillOutput {
        pub date: String,
        pub location: String,
        pub sub_total: f64,
        pub tip: f64,
        pub total_amount: f64,
        pub items: Vec<PersonItem>,
    }
}

pub mod bill {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillInfo {
        #[serde(default)]
        pub name: String,
        pub date: String,
        #[serde(default)]
        pub location: String,
        #[serde(default)]
        pub tip_percentage: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Participant {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantNew {
        #[serde(default)]
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Item {
        pub id: String,
        pub name: String,
        pub amount: f64,
        pub is_shared: bool,
        pub participant_ids: Vec<String>,
    }

    /// Missing fields are rejected by the server with `400`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ItemNew {
        pub name: Option<String>,
        pub amount: Option<f64>,
        #[serde(default)]
        pub is_shared: bool,
        pub participant_ids: Option<Vec<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ItemParticipants {
        pub participant_ids: Vec<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Bill {
        pub id: String,
        pub name: String,
        pub date: String,
        pub location: String,
        pub tip_percentage: f64,
        pub participants: Vec<Participant>,
        pub items: Vec<Item>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillSaved {
        pub message: String,
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Calculation {
        pub bill: Bill,
        pub results: crate::split::BillOutput,
    }
}
