use serde::{Deserialize, Serialize};

use crate::county::FeatureCollection;

/// Commands the host page posts to the map frame. The `type` member
/// selects the command; payload shape is validated at the boundary and
/// a malformed envelope is dropped with a console warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Replace the county overlay with a fresh feature collection.
    UpdateCounties { counties: FeatureCollection },
    /// Fly to a search result and open a popup there.
    UpdateSearch { lng: f64, lat: f64, popup: String },
    /// Drop the search popup and return to the home view.
    ClearSearch,
}

impl HostMessage {
    /// Command names accepted on the wire, in `type` member spelling.
    pub const COMMANDS: [&'static str; 3] = ["updateCounties", "updateSearch", "clearSearch"];

    pub fn is_command(name: &str) -> bool {
        Self::COMMANDS.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_update_counties() {
        let json = r#"{
            "type": "updateCounties",
            "counties": {"type": "FeatureCollection", "features": []}
        }"#;
        let msg: HostMessage = serde_json::from_str(json).unwrap();
        match msg {
            HostMessage::UpdateCounties { counties } => assert!(counties.features.is_empty()),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn parses_update_search() {
        let json = r#"{"type": "updateSearch", "lng": -96.7, "lat": 40.8, "popup": "<b>Lancaster</b>"}"#;
        let msg: HostMessage = serde_json::from_str(json).unwrap();
        match msg {
            HostMessage::UpdateSearch { lng, lat, popup } => {
                assert_eq!(lng, -96.7);
                assert_eq!(lat, 40.8);
                assert_eq!(popup, "<b>Lancaster</b>");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn parses_clear_search() {
        let msg: HostMessage = serde_json::from_str(r#"{"type": "clearSearch"}"#).unwrap();
        assert!(matches!(msg, HostMessage::ClearSearch));
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(serde_json::from_str::<HostMessage>(r#"{"type": "zoomHome"}"#).is_err());
    }

    #[test]
    fn rejects_missing_payload_fields() {
        let json = r#"{"type": "updateSearch", "lng": -96.7}"#;
        assert!(serde_json::from_str::<HostMessage>(json).is_err());
    }

    #[test]
    fn command_names_match_wire_spelling() {
        let tagged = serde_json::to_value(HostMessage::ClearSearch).unwrap();
        assert_eq!(tagged["type"], "clearSearch");
        assert!(HostMessage::is_command("updateCounties"));
        assert!(!HostMessage::is_command("snapshot"));
    }
}
