use std::str::FromStr;

use crate::common::{FormData, FormErrors};
use crate::domains::participants::CreateParticipant;

/// Kind of pre-qualification document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentType {
    IdVerification,
    ProofOfIncome,
    ProofOfResidence,
    Certificate,
    #[default]
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::IdVerification,
        DocumentType::ProofOfIncome,
        DocumentType::ProofOfResidence,
        DocumentType::Certificate,
        DocumentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::IdVerification => "id_verification",
            DocumentType::ProofOfIncome => "proof_of_income",
            DocumentType::ProofOfResidence => "proof_of_residence",
            DocumentType::Certificate => "certificate",
            DocumentType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::IdVerification => "ID Verification",
            DocumentType::ProofOfIncome => "Proof of Income",
            DocumentType::ProofOfResidence => "Proof of Residence",
            DocumentType::Certificate => "Certificate",
            DocumentType::Other => "Other",
        }
    }

    /// Label for a stored value, falling back to the raw value.
    pub fn label_for(value: &str) -> &str {
        value
            .parse::<DocumentType>()
            .map(|t| t.label())
            .unwrap_or(value)
    }
}

impl FromStr for DocumentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid document type: {}", s))
    }
}

/// Text fields of the public membership upload form (the file arrives separately)
pub struct MemberUploadForm<'a> {
    pub fields: &'a FormData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMemberUpload {
    pub participant: CreateParticipant,
    pub document_type: DocumentType,
    pub description: String,
}

impl MemberUploadForm<'_> {
    pub fn email(&self) -> &str {
        self.fields.text("participant_email")
    }

    pub fn validate(&self) -> Result<ValidMemberUpload, FormErrors> {
        let f = self.fields;
        let mut errors = FormErrors::new();

        errors.email("participant_email", self.email());
        errors.max_len("participant_name", f.text("participant_name"), 200);
        errors.max_len("participant_phone", f.text("participant_phone"), 20);
        errors.max_len(
            "participant_children_ages",
            f.text("participant_children_ages"),
            200,
        );
        errors.max_len("description", f.text("description"), 500);

        let names = DocumentType::ALL.map(|t| t.as_str());
        let document_type = errors
            .choice("document_type", f.text("document_type"), &names)
            .and_then(|name| name.parse::<DocumentType>().ok());

        match document_type {
            Some(document_type) => errors.finish(|| ValidMemberUpload {
                participant: CreateParticipant {
                    // New participants need a name; fall back to the address.
                    name: match f.text("participant_name") {
                        "" => self.email().to_lowercase(),
                        name => name.to_string(),
                    },
                    email: self.email().to_lowercase(),
                    phone: f.text("participant_phone").to_string(),
                    children_ages: f.text("participant_children_ages").to_string(),
                },
                document_type,
                description: f.text("description").to_string(),
            }),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn document_type_round_trips_through_strings() {
        for t in DocumentType::ALL {
            assert_eq!(t.as_str().parse::<DocumentType>().unwrap(), t);
        }
        assert!("passport".parse::<DocumentType>().is_err());
        assert_eq!(DocumentType::label_for("proof_of_income"), "Proof of Income");
        assert_eq!(DocumentType::label_for("legacy"), "legacy");
    }

    #[test]
    fn valid_upload_lowercases_email() {
        let fields = form(&[
            ("participant_email", " Parent@Example.org "),
            ("participant_name", "Jordan Lee"),
            ("document_type", "certificate"),
        ]);
        let upload = MemberUploadForm { fields: &fields }.validate().unwrap();
        assert_eq!(upload.participant.email, "parent@example.org");
        assert_eq!(upload.participant.name, "Jordan Lee");
        assert_eq!(upload.document_type, DocumentType::Certificate);
    }

    #[test]
    fn blank_name_falls_back_to_email() {
        let fields = form(&[
            ("participant_email", "parent@example.org"),
            ("document_type", "other"),
        ]);
        let upload = MemberUploadForm { fields: &fields }.validate().unwrap();
        assert_eq!(upload.participant.name, "parent@example.org");
    }

    #[test]
    fn missing_email_and_unknown_type_are_reported() {
        let fields = form(&[("document_type", "passport")]);
        let errors = MemberUploadForm { fields: &fields }.validate().unwrap_err();
        assert!(errors.has("participant_email"));
        assert!(errors.has("document_type"));
    }
}
