//! Form validation for the add/edit asset modal and registration
//!
//! Validation failures are returned as per-field messages; the form keeps its
//! input so the user can correct it.

use std::collections::BTreeMap;

use crate::asset::{Asset, AssetDetails, AssetKind, LandDetails, PropertyDetails};
use crate::session::{DetailValue, RegistrationDetails, FULL_NAME_KEY};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const NUMBER_MESSAGE: &str = "Must be a number";

const LAND_FIELDS: &[&str] = &[
    "numberOfPlots",
    "titleNumber",
    "state",
    "lga",
    "city",
    "pricePerPlot",
    "coFoCID",
];

const PROPERTY_FIELDS: &[&str] = &[
    "name",
    "landIndex",
    "numberOfRooms",
    "numberOfBathrooms",
    "price",
];

const NUMERIC_FIELDS: &[&str] = &[
    "numberOfPlots",
    "pricePerPlot",
    "landIndex",
    "numberOfRooms",
    "numberOfBathrooms",
    "price",
];

/// Per-field validation messages, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }
}

/// Raw input of the add/edit asset modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetForm {
    pub kind: AssetKind,
    fields: BTreeMap<String, String>,
    pub image_ref: Option<String>,
}

impl AssetForm {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
            image_ref: None,
        }
    }

    /// Pre-fill from a stored asset for editing
    pub fn from_asset(asset: &Asset) -> Self {
        let mut form = Self::new(asset.kind());
        form.image_ref = asset.image_ref.clone();
        match &asset.details {
            AssetDetails::Land(land) => {
                form.set_opt("numberOfPlots", land.number_of_plots.map(|v| v.to_string()));
                form.set_opt("titleNumber", land.title_number.clone());
                form.set_opt("state", land.state.clone());
                form.set_opt("lga", land.lga.clone());
                form.set_opt("city", land.city.clone());
                form.set_opt("pricePerPlot", land.price_per_plot.map(|v| v.to_string()));
                form.set_opt("coFoCID", land.certificate_ref.clone());
            }
            AssetDetails::Property(property) => {
                form.set_opt("name", property.name.clone());
                form.set_opt("landIndex", property.land_index.map(|v| v.to_string()));
                form.set_opt("numberOfRooms", property.number_of_rooms.map(|v| v.to_string()));
                form.set_opt(
                    "numberOfBathrooms",
                    property.number_of_bathrooms.map(|v| v.to_string()),
                );
                form.set_opt("price", property.price.map(|v| v.to_string()));
            }
        }
        form
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    fn set_opt(&mut self, field: &str, value: Option<String>) {
        if let Some(value) = value {
            self.fields.insert(field.to_string(), value);
        }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Field names the current kind requires
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self.kind {
            AssetKind::Land => LAND_FIELDS,
            AssetKind::Property => PROPERTY_FIELDS,
        }
    }

    /// Check the form and build the kind's field set
    pub fn validate(&self) -> Result<AssetDetails, FieldErrors> {
        let mut errors = FieldErrors::default();

        for field in self.required_fields() {
            match self.trimmed(field) {
                None => errors.insert(field, REQUIRED_MESSAGE),
                Some(value) if NUMERIC_FIELDS.contains(field) && value.parse::<u64>().is_err() => {
                    errors.insert(field, NUMBER_MESSAGE)
                }
                Some(_) => {}
            }
        }

        if !errors.is_empty() {
            log::debug!("Asset form rejected: {} field error(s)", errors.len());
            return Err(errors);
        }

        Ok(match self.kind {
            AssetKind::Land => AssetDetails::Land(LandDetails {
                number_of_plots: self.number("numberOfPlots"),
                title_number: self.text("titleNumber"),
                state: self.text("state"),
                lga: self.text("lga"),
                city: self.text("city"),
                price_per_plot: self.number("pricePerPlot"),
                certificate_ref: self.text("coFoCID"),
            }),
            AssetKind::Property => AssetDetails::Property(PropertyDetails {
                name: self.text("name"),
                land_index: self.number("landIndex"),
                number_of_rooms: self.number("numberOfRooms"),
                number_of_bathrooms: self.number("numberOfBathrooms"),
                price: self.number("price"),
            }),
        })
    }

    fn trimmed(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn text(&self, field: &str) -> Option<String> {
        self.trimmed(field).map(str::to_string)
    }

    fn number(&self, field: &str) -> Option<u64> {
        self.trimmed(field).and_then(|value| value.parse().ok())
    }
}

/// Registration modal input; `fullName` is the only required detail
pub fn validate_registration(details: &RegistrationDetails) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    let has_name = matches!(
        details.get(FULL_NAME_KEY),
        Some(DetailValue::Text(name)) if !name.trim().is_empty()
    );
    if !has_name {
        errors.insert(FULL_NAME_KEY, REQUIRED_MESSAGE);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_land_form() -> AssetForm {
        let mut form = AssetForm::new(AssetKind::Land);
        form.set("numberOfPlots", "4")
            .set("titleNumber", "LA-2291")
            .set("state", "Lagos")
            .set("lga", "Ikeja")
            .set("city", "Ikeja")
            .set("pricePerPlot", "2500000")
            .set("coFoCID", "bafycofo");
        form
    }

    #[test]
    fn test_empty_property_form_reports_every_field() {
        let form = AssetForm::new(AssetKind::Property);
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), PROPERTY_FIELDS.len());
        assert_eq!(errors.get("name"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get("price"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_land_form_builds_land_details() {
        let details = complete_land_form().validate().unwrap();
        match details {
            AssetDetails::Land(land) => {
                assert_eq!(land.number_of_plots, Some(4));
                assert_eq!(land.title_number.as_deref(), Some("LA-2291"));
                assert_eq!(land.price_per_plot, Some(2_500_000));
                assert_eq!(land.certificate_ref.as_deref(), Some("bafycofo"));
            }
            other => panic!("expected land, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_and_non_numeric_fields() {
        let mut form = complete_land_form();
        form.set("state", "   ").set("pricePerPlot", "cheap");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("state"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get("pricePerPlot"), Some(NUMBER_MESSAGE));
        assert_eq!(errors.len(), 2);
        // Input survives a failed validation
        assert_eq!(form.value("pricePerPlot"), Some("cheap"));
    }

    #[test]
    fn test_image_is_optional() {
        let form = complete_land_form();
        assert!(form.image_ref.is_none());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_prefill_from_asset_roundtrips() {
        let details = complete_land_form().validate().unwrap();
        let asset = Asset {
            id: 1,
            details: details.clone(),
            is_verified: false,
            for_sale: true,
            owner: "Ada".to_string(),
            image_ref: Some("ipfs://img".to_string()),
        };
        let form = AssetForm::from_asset(&asset);
        assert_eq!(form.kind, AssetKind::Land);
        assert_eq!(form.image_ref.as_deref(), Some("ipfs://img"));
        assert_eq!(form.validate().unwrap(), details);
    }

    #[test]
    fn test_registration_requires_full_name() {
        let mut details = RegistrationDetails::new();
        details.insert("location".to_string(), "Lagos".into());
        let errors = validate_registration(&details).unwrap_err();
        assert_eq!(errors.get(FULL_NAME_KEY), Some(REQUIRED_MESSAGE));

        details.insert(FULL_NAME_KEY.to_string(), "Ada".into());
        assert!(validate_registration(&details).is_ok());
    }
}
