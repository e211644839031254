use std::str::FromStr;

use crate::common::{FormData, FormErrors, ParticipantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VaultCategory {
    Certificate,
    Identification,
    Financial,
    Legal,
    #[default]
    Other,
}

impl VaultCategory {
    pub const ALL: [VaultCategory; 5] = [
        VaultCategory::Certificate,
        VaultCategory::Identification,
        VaultCategory::Financial,
        VaultCategory::Legal,
        VaultCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VaultCategory::Certificate => "certificate",
            VaultCategory::Identification => "identification",
            VaultCategory::Financial => "financial",
            VaultCategory::Legal => "legal",
            VaultCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VaultCategory::Certificate => "Certificate",
            VaultCategory::Identification => "Identification",
            VaultCategory::Financial => "Financial",
            VaultCategory::Legal => "Legal",
            VaultCategory::Other => "Other",
        }
    }

    pub fn label_for(value: &str) -> &str {
        value
            .parse::<VaultCategory>()
            .map(|c| c.label())
            .unwrap_or(value)
    }
}

impl FromStr for VaultCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid vault category: {}", s))
    }
}

/// Text fields of the vault upload form (multipart)
pub struct VaultItemForm<'a> {
    pub fields: &'a FormData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidVaultItem {
    pub title: String,
    pub description: String,
    pub category: VaultCategory,
    pub participant_id: Option<ParticipantId>,
}

impl VaultItemForm<'_> {
    /// Shape validation only; the caller confirms the participant exists.
    pub fn validate(&self) -> Result<ValidVaultItem, FormErrors> {
        let f = self.fields;
        let mut errors = FormErrors::new();
        errors.text("title", f.text("title"), 200);

        let names = VaultCategory::ALL.map(|c| c.as_str());
        let category = errors
            .choice("category", f.text("category"), &names)
            .and_then(|name| name.parse::<VaultCategory>().ok());

        let participant_id = match f.optional("participant") {
            None => None,
            Some(raw) => match ParticipantId::parse(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("participant", "Select a valid participant.");
                    None
                }
            },
        };

        match category {
            Some(category) => errors.finish(|| ValidVaultItem {
                title: f.text("title").to_string(),
                description: f.text("description").to_string(),
                category,
                participant_id,
            }),
            None => Err(errors),
        }
    }
}
