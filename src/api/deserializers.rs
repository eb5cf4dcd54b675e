use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;

/// Deserialize an id that the list endpoint sends either as a number or as a numeric string
pub fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumberOrString;

    impl<'de> Visitor<'de> for NumberOrString {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an unsigned integer or a numeric string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(value).map_err(|_| E::custom(format!("negative id: {}", value)))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid numeric id: {}", value)))
        }
    }

    deserializer.deserialize_any(NumberOrString)
}

/// Deserialize an optional continuation token that may arrive as a string or a number
pub fn optional_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionalToken;

    impl<'de> Visitor<'de> for OptionalToken {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a continuation token, or null")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if value.is_empty() {
                Ok(None)
            } else {
                Ok(Some(value.to_string()))
            }
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }
    }

    deserializer.deserialize_any(OptionalToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json;

    #[derive(Debug, Deserialize)]
    struct Item {
        #[serde(deserialize_with = "number_or_string")]
        id: u64,
    }

    #[derive(Debug, Deserialize)]
    struct Page {
        #[serde(default, deserialize_with = "optional_token")]
        offset: Option<String>,
    }

    #[test]
    fn test_numeric_id() {
        let item: Item = serde_json::from_str(r#"{"id": 4821}"#).unwrap();
        assert_eq!(item.id, 4821);
    }

    #[test]
    fn test_string_id() {
        let item: Item = serde_json::from_str(r#"{"id": "4821"}"#).unwrap();
        assert_eq!(item.id, 4821);
    }

    #[test]
    fn test_invalid_id() {
        assert!(serde_json::from_str::<Item>(r#"{"id": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Item>(r#"{"id": -3}"#).is_err());
    }

    #[test]
    fn test_token_variants() {
        let page: Page = serde_json::from_str(r#"{"offset": "Blue-Eyes"}"#).unwrap();
        assert_eq!(page.offset.as_deref(), Some("Blue-Eyes"));

        let page: Page = serde_json::from_str(r#"{"offset": 5000}"#).unwrap();
        assert_eq!(page.offset.as_deref(), Some("5000"));

        let page: Page = serde_json::from_str(r#"{"offset": null}"#).unwrap();
        assert_eq!(page.offset, None);

        let page: Page = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(page.offset, None);
    }
}
