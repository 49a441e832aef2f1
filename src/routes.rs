//! Navigation targets
//!
//! Only an asset id travels between pages; the destination re-fetches the
//! asset so it never renders a stale copy carried in the URL.

use crate::asset::AssetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Dashboard,
    BuyProperty { asset_id: AssetId },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::BuyProperty { asset_id } => format!("/buy-property?asset={}", asset_id),
        }
    }

    /// Parse a path (with optional query) back into a route
    pub fn parse(path: &str) -> Option<Route> {
        let (base, query) = match path.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (path, None),
        };

        match base.trim_end_matches('/') {
            "" => Some(Route::Landing),
            "/dashboard" => Some(Route::Dashboard),
            "/buy-property" => {
                let asset_id = query?
                    .split('&')
                    .filter_map(|pair| pair.split_once('='))
                    .find(|(key, _)| *key == "asset")
                    .and_then(|(_, value)| value.parse().ok())?;
                Some(Route::BuyProperty { asset_id })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Landing.path(), "/");
        assert_eq!(Route::Dashboard.path(), "/dashboard");
        assert_eq!(
            Route::BuyProperty { asset_id: 5 }.path(),
            "/buy-property?asset=5"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Landing));
        assert_eq!(Route::parse("/dashboard"), Some(Route::Dashboard));
        assert_eq!(Route::parse("/dashboard/"), Some(Route::Dashboard));
        assert_eq!(
            Route::parse("/buy-property?ref=x&asset=1718000000000"),
            Some(Route::BuyProperty {
                asset_id: 1718000000000
            })
        );
    }

    #[test]
    fn test_parse_rejects_json_blob() {
        // The old front-end put the whole asset in the query string
        let legacy = r#"/buy-property?asset={"id":5,"type":"Land"}"#;
        assert_eq!(Route::parse(legacy), None);
        assert_eq!(Route::parse("/buy-property"), None);
        assert_eq!(Route::parse("/unknown"), None);
    }
}
