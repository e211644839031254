use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;

use super::models::{CreateDonation, NewDistribution};
use crate::common::{DonationId, FormErrors, VendorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DonationMethod {
    Paypal,
    Check,
    Cash,
    BankTransfer,
    #[default]
    Other,
}

impl DonationMethod {
    pub const ALL: [DonationMethod; 5] = [
        DonationMethod::Paypal,
        DonationMethod::Check,
        DonationMethod::Cash,
        DonationMethod::BankTransfer,
        DonationMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationMethod::Paypal => "paypal",
            DonationMethod::Check => "check",
            DonationMethod::Cash => "cash",
            DonationMethod::BankTransfer => "bank_transfer",
            DonationMethod::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DonationMethod::Paypal => "PayPal",
            DonationMethod::Check => "Check",
            DonationMethod::Cash => "Cash",
            DonationMethod::BankTransfer => "Bank Transfer",
            DonationMethod::Other => "Other",
        }
    }

    pub fn label_for(value: &str) -> &str {
        value
            .parse::<DonationMethod>()
            .map(|m| m.label())
            .unwrap_or(value)
    }
}

impl FromStr for DonationMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid donation method: {}", s))
    }
}

/// Staff form for recording a received donation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DonationForm {
    pub donor_name: String,
    pub donor_email: String,
    pub amount: String,
    pub method: String,
    pub reference: String,
    pub note: String,
    pub received_on: String,
}

impl DonationForm {
    /// A blank `received_on` means `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<CreateDonation, FormErrors> {
        let mut errors = FormErrors::new();
        errors.text("donor_name", &self.donor_name, 200);
        errors.optional_email("donor_email", &self.donor_email);
        errors.max_len("reference", &self.reference, 100);
        let amount = errors.amount("amount", &self.amount);

        let names = DonationMethod::ALL.map(|m| m.as_str());
        let method = errors.choice("method", &self.method, &names);

        let received_on = if self.received_on.trim().is_empty() {
            Some(today)
        } else {
            errors.date("received_on", &self.received_on)
        };

        match (amount, method, received_on) {
            (Some(amount), Some(method), Some(received_on)) => errors.finish(|| CreateDonation {
                donor_name: self.donor_name.trim().to_string(),
                donor_email: self.donor_email.trim().to_string(),
                amount,
                method: method.to_string(),
                reference: self.reference.trim().to_string(),
                note: self.note.trim().to_string(),
                received_on,
            }),
            _ => Err(errors),
        }
    }
}

/// Staff form for earmarking donation funds for a vendor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DistributionForm {
    pub donation: String,
    pub vendor: String,
    pub amount: String,
    pub purpose: String,
}

impl DistributionForm {
    pub fn validate(&self) -> Result<NewDistribution, FormErrors> {
        let mut errors = FormErrors::new();

        let donation_id = if errors.required("donation", &self.donation) {
            DonationId::parse(&self.donation)
                .map_err(|_| errors.add("donation", "Select a valid donation."))
                .ok()
        } else {
            None
        };
        let vendor_id = if errors.required("vendor", &self.vendor) {
            VendorId::parse(&self.vendor)
                .map_err(|_| errors.add("vendor", "Select a valid vendor."))
                .ok()
        } else {
            None
        };
        let amount = errors.amount("amount", &self.amount);
        errors.text("purpose", &self.purpose, 500);

        match (donation_id, vendor_id, amount) {
            (Some(donation_id), Some(vendor_id), Some(amount)) => errors.finish(|| NewDistribution {
                donation_id,
                vendor_id,
                amount,
                purpose: self.purpose.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn donation_defaults_received_on_to_today() {
        let form = DonationForm {
            donor_name: "Riverside Rotary".to_string(),
            amount: "1,000".to_string(),
            method: "check".to_string(),
            ..Default::default()
        };
        let donation = form.validate(today()).unwrap();
        assert_eq!(donation.received_on, today());
        assert_eq!(donation.amount, Decimal::from(1000));
        assert_eq!(donation.method, "check");
    }

    #[test]
    fn donation_rejects_unknown_method_and_bad_amount() {
        let form = DonationForm {
            donor_name: "Anonymous".to_string(),
            amount: "0".to_string(),
            method: "crypto".to_string(),
            ..Default::default()
        };
        let errors = form.validate(today()).unwrap_err();
        assert!(errors.has("amount"));
        assert!(errors.has("method"));
    }

    #[test]
    fn distribution_requires_ids() {
        let form = DistributionForm {
            donation: "not-an-id".to_string(),
            vendor: String::new(),
            amount: "25.00".to_string(),
            purpose: "School supplies".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("donation"), Some("Select a valid donation."));
        assert_eq!(errors.get("vendor"), Some("This field is required."));
    }

    #[test]
    fn valid_distribution() {
        let donation_id = DonationId::new();
        let vendor_id = VendorId::new();
        let form = DistributionForm {
            donation: donation_id.to_string(),
            vendor: vendor_id.to_string(),
            amount: "$25.50".to_string(),
            purpose: "Winter coats".to_string(),
        };
        let distribution = form.validate().unwrap();
        assert_eq!(distribution.donation_id, donation_id);
        assert_eq!(distribution.vendor_id, vendor_id);
        assert_eq!(distribution.amount, "25.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn method_labels() {
        assert_eq!(DonationMethod::label_for("bank_transfer"), "Bank Transfer");
        assert_eq!(DonationMethod::label_for("barter"), "barter");
    }
}
