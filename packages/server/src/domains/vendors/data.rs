use serde::Deserialize;

use crate::common::{FormData, FormErrors};

/// Text fields of the public vendor submission form (multipart)
pub struct VendorForm<'a> {
    pub fields: &'a FormData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidVendor {
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub services_description: String,
}

impl VendorForm<'_> {
    pub fn validate(&self) -> Result<ValidVendor, FormErrors> {
        let f = self.fields;
        let mut errors = FormErrors::new();
        errors.text("business_name", f.text("business_name"), 200);
        errors.text("contact_name", f.text("contact_name"), 200);
        errors.email("email", f.text("email"));
        errors.text("phone", f.text("phone"), 20);
        errors.optional_url("website", f.text("website"));
        errors.required("services_description", f.text("services_description"));

        errors.finish(|| ValidVendor {
            business_name: f.text("business_name").to_string(),
            contact_name: f.text("contact_name").to_string(),
            email: f.text("email").to_string(),
            phone: f.text("phone").to_string(),
            website: f.text("website").to_string(),
            services_description: f.text("services_description").to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RejectForm {
    pub reason: String,
}

impl RejectForm {
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        errors.text("reason", &self.reason, 1000);
        errors.finish(|| self.reason.trim().to_string())
    }
}
