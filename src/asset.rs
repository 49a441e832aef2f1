//! Tokenized land and property records
//!
//! The stored JSON layout is the one the web front-end has always written
//! (`type` tag, camelCase keys, `imageCID`/`coFoCID`). Kind-specific fields
//! live in [`AssetDetails`] so an asset can never carry the other kind's
//! fields.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Asset identifier (creation timestamp in milliseconds for local assets)
pub type AssetId = u64;

/// Shown when an asset has no image of its own
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.pexels.com/photos/106399/pexels-photo-106399.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Property,
    Land,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Property => f.write_str("Property"),
            AssetKind::Land => f.write_str("Land"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandDetails {
    #[serde(default, deserialize_with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub number_of_plots: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lga: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub price_per_plot: Option<u64>,
    /// Certificate of occupancy reference (content id)
    #[serde(rename = "coFoCID", default, skip_serializing_if = "Option::is_none")]
    pub certificate_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub land_index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub number_of_rooms: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub number_of_bathrooms: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
}

/// Kind-dependent field set, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssetDetails {
    Land(LandDetails),
    Property(PropertyDetails),
}

impl AssetDetails {
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetDetails::Land(_) => AssetKind::Land,
            AssetDetails::Property(_) => AssetKind::Property,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    #[serde(flatten)]
    pub details: AssetDetails,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_for_sale")]
    pub for_sale: bool,
    /// Owner display name (not a wallet address)
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "imageCID", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

fn default_for_sale() -> bool {
    true
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        self.details.kind()
    }

    /// Card heading: "state, city" for land, the name for property
    pub fn title(&self) -> String {
        match &self.details {
            AssetDetails::Land(land) => format!(
                "{}, {}",
                land.state.as_deref().unwrap_or(""),
                land.city.as_deref().unwrap_or("")
            ),
            AssetDetails::Property(property) => property.name.clone().unwrap_or_default(),
        }
    }

    /// Card sub-heading: LGA for land, room/bath counts for property
    pub fn subtitle(&self) -> String {
        match &self.details {
            AssetDetails::Land(land) => land.lga.clone().unwrap_or_default(),
            AssetDetails::Property(property) => format!(
                "{} rooms, {} baths",
                opt_to_string(property.number_of_rooms),
                opt_to_string(property.number_of_bathrooms)
            ),
        }
    }

    /// Price per plot for land, total price for property
    pub fn display_price(&self) -> Option<u64> {
        match &self.details {
            AssetDetails::Land(land) => land.price_per_plot,
            AssetDetails::Property(property) => property.price,
        }
    }

    pub fn image_or_default(&self) -> &str {
        self.image_ref.as_deref().unwrap_or(DEFAULT_IMAGE_URL)
    }

    /// Case-insensitive substring search over state/city (land) or name (property)
    ///
    /// `needle` must already be lower-cased. An asset without any searchable
    /// field never matches, not even the empty query.
    pub fn matches_search(&self, needle: &str) -> bool {
        let fields: Vec<&str> = match &self.details {
            AssetDetails::Land(land) => [land.state.as_deref(), land.city.as_deref()]
                .into_iter()
                .flatten()
                .collect(),
            AssetDetails::Property(property) => property.name.as_deref().into_iter().collect(),
        };
        fields
            .into_iter()
            .filter(|field| !field.is_empty())
            .any(|field| field.to_lowercase().contains(needle))
    }
}

fn opt_to_string(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Unsigned(u64),
    Float(f64),
    Text(String),
}

/// Numbers written by HTML forms arrive as strings; unusable values read as absent
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawScalar> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Unsigned(n)) => Some(n),
        Some(RawScalar::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Some(f as u64)
        }
        Some(RawScalar::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawScalar> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Unsigned(n)) => Some(n.to_string()),
        Some(RawScalar::Float(f)) => Some(f.to_string()),
        Some(RawScalar::Text(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn land(id: AssetId, state: &str, city: &str) -> Asset {
        Asset {
            id,
            details: AssetDetails::Land(LandDetails {
                state: Some(state.to_string()),
                city: Some(city.to_string()),
                lga: Some("Ikeja".to_string()),
                price_per_plot: Some(1_500_000),
                ..Default::default()
            }),
            is_verified: false,
            for_sale: true,
            owner: "Ada".to_string(),
            image_ref: None,
        }
    }

    #[test]
    fn test_parses_front_end_land_record() {
        let json = r#"{
            "id": 1718000000000,
            "type": "Land",
            "isVerified": false,
            "forSale": true,
            "owner": "Ada",
            "numberOfPlots": "4",
            "titleNumber": 99812,
            "state": "Lagos",
            "lga": "Ikeja",
            "city": "Ikeja",
            "pricePerPlot": "2500000",
            "coFoCID": "bafy..."
        }"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.kind(), AssetKind::Land);
        match &asset.details {
            AssetDetails::Land(land) => {
                assert_eq!(land.number_of_plots, Some(4));
                assert_eq!(land.title_number.as_deref(), Some("99812"));
                assert_eq!(land.price_per_plot, Some(2_500_000));
                assert_eq!(land.certificate_ref.as_deref(), Some("bafy..."));
            }
            other => panic!("expected land, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let json = r#"{"id": 7, "type": "Property"}"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert!(asset.for_sale);
        assert!(!asset.is_verified);
        assert_eq!(asset.owner, "");
        assert_eq!(asset.details, AssetDetails::Property(PropertyDetails::default()));
    }

    #[test]
    fn test_unparseable_number_is_absent() {
        let json = r#"{"id": 7, "type": "Property", "name": "Villa", "price": "lots"}"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.display_price(), None);
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let asset = land(3, "Lagos", "Ikeja");
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["type"], "Land");
        assert_eq!(value["state"], "Lagos");
        assert_eq!(value["forSale"], true);
        assert!(value.get("name").is_none());
        assert!(value.get("imageCID").is_none());
    }

    #[test]
    fn test_display_helpers() {
        let asset = land(3, "Lagos", "Ikeja");
        assert_eq!(asset.title(), "Lagos, Ikeja");
        assert_eq!(asset.subtitle(), "Ikeja");
        assert_eq!(asset.display_price(), Some(1_500_000));
        assert_eq!(asset.image_or_default(), DEFAULT_IMAGE_URL);

        let villa = Asset {
            id: 4,
            details: AssetDetails::Property(PropertyDetails {
                name: Some("Sunset Villa".to_string()),
                number_of_rooms: Some(4),
                number_of_bathrooms: Some(3),
                price: Some(90_000),
                ..Default::default()
            }),
            is_verified: false,
            for_sale: true,
            owner: "Ada".to_string(),
            image_ref: Some("ipfs://villa".to_string()),
        };
        assert_eq!(villa.title(), "Sunset Villa");
        assert_eq!(villa.subtitle(), "4 rooms, 3 baths");
        assert_eq!(villa.image_or_default(), "ipfs://villa");
    }

    #[test]
    fn test_search_without_fields_never_matches() {
        let bare = Asset {
            id: 1,
            details: AssetDetails::Land(LandDetails::default()),
            is_verified: false,
            for_sale: true,
            owner: String::new(),
            image_ref: None,
        };
        assert!(!bare.matches_search(""));
        assert!(!bare.matches_search("lagos"));
        assert!(land(2, "Lagos", "Ikeja").matches_search("ikej"));
    }
}
