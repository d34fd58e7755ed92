//! Built-in onboarding step definitions.

use super::step::{FieldFormat, FieldSchema, StepDefinition};

/// The four onboarding steps in submission order.
pub fn builtin_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition {
            number: 1,
            name: "basics".to_string(),
            title: "Business basics".to_string(),
            fields: vec![
                FieldSchema::required("business_name", "Business name")
                    .max_length(100)
                    .placeholder("Acme Corp"),
                FieldSchema::required("industry", "Industry").placeholder("Retail"),
                FieldSchema::required("business_type", "Business type").placeholder("LLC"),
                FieldSchema::required("description", "Description").max_length(1000),
            ],
        },
        StepDefinition {
            number: 2,
            name: "contact".to_string(),
            title: "Contact details".to_string(),
            fields: vec![
                FieldSchema::required("email", "Contact email")
                    .format(FieldFormat::Email)
                    .placeholder("owner@example.com"),
                FieldSchema::required("phone", "Phone number").max_length(30),
                FieldSchema::optional("website", "Website")
                    .format(FieldFormat::Url)
                    .placeholder("https://example.com"),
            ],
        },
        StepDefinition {
            number: 3,
            name: "location".to_string(),
            title: "Location".to_string(),
            fields: vec![
                FieldSchema::required("address", "Street address"),
                FieldSchema::required("city", "City"),
                FieldSchema::required("region", "State / region"),
                FieldSchema::required("postal_code", "Postal code").max_length(12),
                FieldSchema::optional("country", "Country"),
            ],
        },
        StepDefinition {
            number: 4,
            name: "presence".to_string(),
            title: "Online presence".to_string(),
            fields: vec![
                FieldSchema::optional("tagline", "Tagline").max_length(140),
                FieldSchema::optional("logo_url", "Logo URL").format(FieldFormat::Url),
                FieldSchema::optional("facebook_url", "Facebook page").format(FieldFormat::Url),
                FieldSchema::optional("instagram_url", "Instagram profile")
                    .format(FieldFormat::Url),
            ],
        },
    ]
}
