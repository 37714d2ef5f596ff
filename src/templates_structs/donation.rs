use askama::Template;

use crate::models::donation::DonationDisplay;
use super::PageContext;

#[derive(Template)]
#[template(path = "donations/list.html")]
pub struct DonationListTemplate {
    pub ctx: PageContext,
    pub donations: Vec<DonationDisplay>,
    pub search: String,
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Template)]
#[template(path = "donations/detail.html")]
pub struct DonationDetailTemplate {
    pub ctx: PageContext,
    pub donation: DonationDisplay,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Debug, Clone)]
pub struct DonationFormValues {
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub donation_type: String,
    pub amount: String,
    pub currency: String,
    pub description: String,
    pub donation_date: String,
}

impl Default for DonationFormValues {
    fn default() -> Self {
        DonationFormValues {
            donor_name: String::new(),
            donor_email: String::new(),
            donor_phone: String::new(),
            donation_type: "monetary".to_string(),
            amount: String::new(),
            currency: "USD".to_string(),
            description: String::new(),
            donation_date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "donations/form.html")]
pub struct DonationFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: DonationFormValues,
    /// (code, label) pairs.
    pub kinds: Vec<(String, String)>,
    pub errors: Vec<String>,
}
