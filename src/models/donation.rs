use serde::{Deserialize, Serialize};

use super::display::{amount_or_na, date_or_na, or_na, timestamp_or_na};
use super::listing::{Listed, lenient_id};

/// Donation kinds accepted by the backend, with their labels.
pub const DONATION_KINDS: &[(&str, &str)] = &[
    ("monetary", "Monetary"),
    ("in_kind", "In-kind"),
    ("time", "Time"),
];

pub fn kind_label(kind: Option<&str>) -> String {
    match kind {
        Some(k) => DONATION_KINDS
            .iter()
            .find(|(code, _)| *code == k)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| or_na(Some(k))),
        None => or_na(None),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Donation {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub donor_email: Option<String>,
    #[serde(default)]
    pub donor_phone: Option<String>,
    #[serde(default)]
    pub donation_type: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub donation_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub recorded_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Listed for Donation {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        [self.donor_name.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct DonationDisplay {
    pub id: String,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub kind: String,
    pub amount: String,
    pub description: String,
    pub donation_date: String,
    pub recorded_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Donation> for DonationDisplay {
    fn from(d: &Donation) -> Self {
        DonationDisplay {
            id: d.id.clone().unwrap_or_default(),
            donor_name: or_na(d.donor_name.as_deref()),
            donor_email: or_na(d.donor_email.as_deref()),
            donor_phone: or_na(d.donor_phone.as_deref()),
            kind: kind_label(d.donation_type.as_deref()),
            amount: amount_or_na(d.amount, d.currency.as_deref()),
            description: or_na(d.description.as_deref()),
            donation_date: date_or_na(d.donation_date.as_deref()),
            recorded_by: or_na(d.recorded_by.as_deref()),
            created_at: timestamp_or_na(d.created_at.as_deref()),
            updated_at: timestamp_or_na(d.updated_at.as_deref()),
        }
    }
}

/// Body for `POST /donations/` and `PUT /donations/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct DonationRequest {
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub donation_type: String,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub donation_date: String,
}
