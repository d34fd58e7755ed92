//! Typed per-step onboarding records.
//!
//! Validated submissions are parsed into these records at the schema
//! boundary; everything downstream of validation works with typed data
//! rather than raw string maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directory::NewBusiness;
use crate::schema::ValidatedFields;

/// Internal inconsistencies in accumulated step data. These indicate a bug
/// or a corrupted session, not a user mistake.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepDataError {
    #[error("onboarding data for step {0} is missing")]
    Missing(u32),
    #[error("onboarding data for step {0} belongs to a different step")]
    Mismatch(u32),
    #[error("validated submission lost required field '{0}'")]
    MissingField(&'static str),
    #[error("step {0} has no typed record")]
    UnknownStep(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicsRecord {
    pub business_name: String,
    pub industry: String,
    pub business_type: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PresenceRecord {
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
}

/// One step's validated data, tagged by step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepRecord {
    Basics(BasicsRecord),
    Contact(ContactRecord),
    Location(LocationRecord),
    Presence(PresenceRecord),
}

fn require(fields: &ValidatedFields, name: &'static str) -> Result<String, StepDataError> {
    fields
        .get(name)
        .cloned()
        .ok_or(StepDataError::MissingField(name))
}

fn maybe(fields: &ValidatedFields, name: &str) -> Option<String> {
    fields.get(name).cloned()
}

impl StepRecord {
    /// Which step this record belongs to.
    pub fn step_number(&self) -> u32 {
        match self {
            StepRecord::Basics(_) => 1,
            StepRecord::Contact(_) => 2,
            StepRecord::Location(_) => 3,
            StepRecord::Presence(_) => 4,
        }
    }

    /// Parse a validated submission for step `n` into its typed record.
    pub fn from_validated(n: u32, fields: &ValidatedFields) -> Result<Self, StepDataError> {
        match n {
            1 => Ok(StepRecord::Basics(BasicsRecord {
                business_name: require(fields, "business_name")?,
                industry: require(fields, "industry")?,
                business_type: require(fields, "business_type")?,
                description: require(fields, "description")?,
            })),
            2 => Ok(StepRecord::Contact(ContactRecord {
                email: require(fields, "email")?,
                phone: require(fields, "phone")?,
                website: maybe(fields, "website"),
            })),
            3 => Ok(StepRecord::Location(LocationRecord {
                address: require(fields, "address")?,
                city: require(fields, "city")?,
                region: require(fields, "region")?,
                postal_code: require(fields, "postal_code")?,
                country: maybe(fields, "country"),
            })),
            4 => Ok(StepRecord::Presence(PresenceRecord {
                tagline: maybe(fields, "tagline"),
                logo_url: maybe(fields, "logo_url"),
                facebook_url: maybe(fields, "facebook_url"),
                instagram_url: maybe(fields, "instagram_url"),
            })),
            other => Err(StepDataError::UnknownStep(other)),
        }
    }

    /// Flatten back to field name/value pairs for pre-fill and review views.
    pub fn to_fields(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        match self {
            StepRecord::Basics(r) => {
                put(&mut fields, "business_name", &r.business_name);
                put(&mut fields, "industry", &r.industry);
                put(&mut fields, "business_type", &r.business_type);
                put(&mut fields, "description", &r.description);
            }
            StepRecord::Contact(r) => {
                put(&mut fields, "email", &r.email);
                put(&mut fields, "phone", &r.phone);
                put_opt(&mut fields, "website", &r.website);
            }
            StepRecord::Location(r) => {
                put(&mut fields, "address", &r.address);
                put(&mut fields, "city", &r.city);
                put(&mut fields, "region", &r.region);
                put(&mut fields, "postal_code", &r.postal_code);
                put_opt(&mut fields, "country", &r.country);
            }
            StepRecord::Presence(r) => {
                put_opt(&mut fields, "tagline", &r.tagline);
                put_opt(&mut fields, "logo_url", &r.logo_url);
                put_opt(&mut fields, "facebook_url", &r.facebook_url);
                put_opt(&mut fields, "instagram_url", &r.instagram_url);
            }
        }
        fields
    }
}

fn put(fields: &mut BTreeMap<String, String>, name: &str, value: &str) {
    fields.insert(name.to_string(), value.to_string());
}

fn put_opt(fields: &mut BTreeMap<String, String>, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        fields.insert(name.to_string(), value.clone());
    }
}

/// Merge the accumulated step records into one complete business record.
///
/// The caller guarantees completeness before calling; a missing or
/// mismatched entry here is an internal inconsistency.
pub fn merge_record(steps: &BTreeMap<u32, StepRecord>) -> Result<NewBusiness, StepDataError> {
    let fetch = |n: u32| steps.get(&n).ok_or(StepDataError::Missing(n));

    let StepRecord::Basics(basics) = fetch(1)? else {
        return Err(StepDataError::Mismatch(1));
    };
    let StepRecord::Contact(contact) = fetch(2)? else {
        return Err(StepDataError::Mismatch(2));
    };
    let StepRecord::Location(location) = fetch(3)? else {
        return Err(StepDataError::Mismatch(3));
    };
    let StepRecord::Presence(presence) = fetch(4)? else {
        return Err(StepDataError::Mismatch(4));
    };

    Ok(NewBusiness {
        business_name: basics.business_name.clone(),
        industry: basics.industry.clone(),
        business_type: basics.business_type.clone(),
        description: basics.description.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        website: contact.website.clone(),
        address: location.address.clone(),
        city: location.city.clone(),
        region: location.region.clone(),
        postal_code: location.postal_code.clone(),
        country: location.country.clone(),
        tagline: presence.tagline.clone(),
        logo_url: presence.logo_url.clone(),
        facebook_url: presence.facebook_url.clone(),
        instagram_url: presence.instagram_url.clone(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn basics() -> StepRecord {
        StepRecord::Basics(BasicsRecord {
            business_name: "Acme Corp".to_string(),
            industry: "Tech".to_string(),
            business_type: "LLC".to_string(),
            description: "Widgets and more".to_string(),
        })
    }

    pub fn contact() -> StepRecord {
        StepRecord::Contact(ContactRecord {
            email: "owner@acme.example".to_string(),
            phone: "555-0100".to_string(),
            website: Some("https://acme.example".to_string()),
        })
    }

    pub fn location() -> StepRecord {
        StepRecord::Location(LocationRecord {
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            region: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: None,
        })
    }

    pub fn presence() -> StepRecord {
        StepRecord::Presence(PresenceRecord::default())
    }

    pub fn record_for(n: u32) -> StepRecord {
        match n {
            1 => basics(),
            2 => contact(),
            3 => location(),
            _ => presence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::schema::StepRegistry;
    use std::collections::HashMap;

    #[test]
    fn test_every_builtin_step_parses_after_validation() {
        let registry = StepRegistry::builtin();
        let submissions: Vec<(u32, Vec<(&str, &str)>)> = vec![
            (
                1,
                vec![
                    ("business_name", "Acme Corp"),
                    ("industry", "Tech"),
                    ("business_type", "LLC"),
                    ("description", "Widgets"),
                ],
            ),
            (
                2,
                vec![("email", "owner@acme.example"), ("phone", "555-0100")],
            ),
            (
                3,
                vec![
                    ("address", "1 Main St"),
                    ("city", "Springfield"),
                    ("region", "IL"),
                    ("postal_code", "62701"),
                ],
            ),
            (4, vec![("tagline", "Widgets, delivered")]),
        ];

        for (n, pairs) in submissions {
            let submitted: HashMap<String, String> = pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let validated = registry.validate(n, &submitted).unwrap().unwrap();
            let record = StepRecord::from_validated(n, &validated).unwrap();
            assert_eq!(record.step_number(), n);
        }
    }

    #[test]
    fn test_to_fields_skips_absent_optionals() {
        let fields = location().to_fields();
        assert_eq!(fields.get("city").unwrap(), "Springfield");
        assert!(!fields.contains_key("country"));
    }

    #[test]
    fn test_serde_roundtrip_is_tagged() {
        let value = serde_json::to_value(basics()).unwrap();
        assert_eq!(value.get("step").unwrap(), "basics");
        let back: StepRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, basics());
    }

    #[test]
    fn test_merge_complete_steps() {
        let steps: BTreeMap<u32, StepRecord> = (1..=4).map(|n| (n, record_for(n))).collect();
        let record = merge_record(&steps).unwrap();
        assert_eq!(record.business_name, "Acme Corp");
        assert_eq!(record.email, "owner@acme.example");
        assert_eq!(record.postal_code, "62701");
        assert_eq!(record.tagline, None);
    }

    #[test]
    fn test_merge_missing_step() {
        let mut steps: BTreeMap<u32, StepRecord> = (1..=4).map(|n| (n, record_for(n))).collect();
        steps.remove(&3);
        assert_eq!(merge_record(&steps).unwrap_err(), StepDataError::Missing(3));
    }

    #[test]
    fn test_merge_mismatched_step() {
        let mut steps: BTreeMap<u32, StepRecord> = (1..=4).map(|n| (n, record_for(n))).collect();
        steps.insert(2, basics());
        assert_eq!(
            merge_record(&steps).unwrap_err(),
            StepDataError::Mismatch(2)
        );
    }

    #[test]
    fn test_from_validated_unknown_step() {
        assert_eq!(
            StepRecord::from_validated(9, &Default::default()).unwrap_err(),
            StepDataError::UnknownStep(9)
        );
    }
}
