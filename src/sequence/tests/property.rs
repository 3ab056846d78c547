/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Tests for property constants and the result map.

#[cfg(test)]
mod tests {
    use crate::sequence::property::{self, Properties, property_description};

    #[test]
    fn test_known_property_descriptions() {
        assert_eq!(property_description(property::USER_ID), "unique user ID");
        assert_eq!(
            property_description(property::SUBMITTED_AUTH_ADDRESS_LIST),
            "submitted auth address list"
        );
        assert_eq!(
            property_description(property::SUBMITTED_CC_ADDRESS_LIST),
            "submitted CC address list"
        );
        assert_eq!(
            property_description(property::MARKET_SESSION),
            "market session (system property)"
        );
        assert_eq!(
            property_description(property::SOCKET_ACCESS),
            "socket access (system property)"
        );
        assert_eq!(
            property_description(property::BITCOIN_PARTICIPANT),
            "general trading"
        );
        assert_eq!(property_description(property::BITCOIN_DEALER), "XBT dealing");
    }

    #[test]
    fn test_unknown_property_description_is_sentinel() {
        assert_eq!(property_description("NoSuchProperty"), "undefined property");
        assert_eq!(property_description(""), "undefined property");
    }

    #[test]
    fn test_properties_insert_and_get() {
        let mut properties = Properties::new();
        assert!(properties.is_empty());

        properties.insert(property::USER_ID, "u-1");
        properties.insert(property::BITCOIN_DEALER, "true");

        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get(property::USER_ID), Some("u-1"));
        assert!(properties.contains(property::BITCOIN_DEALER));
        assert_eq!(properties.get("missing"), None);
    }

    #[test]
    fn test_properties_replace_value() {
        let mut properties = Properties::new();
        properties.insert(property::USER_ID, "u-1");
        properties.insert(property::USER_ID, "u-2");

        assert_eq!(properties.len(), 1);
        assert_eq!(properties.get(property::USER_ID), Some("u-2"));
    }

    #[test]
    fn test_properties_into_inner() {
        let mut properties = Properties::new();
        properties.insert("a", "1");

        let inner = properties.into_inner();
        assert_eq!(inner.get("a").map(String::as_str), Some("1"));
    }
}
