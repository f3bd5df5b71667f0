//! # Taxonomy Document Decoding
//!
//! Decodes the text of a `qna.yaml` file straight into the JSON value the
//! schema validator consumes, without an intermediate YAML tree.
//!
//! Decoding is lenient where YAML loaders traditionally are:
//!
//! - A key repeated within one mapping keeps its last value. Every repeat is
//!   recorded in [`TaxonomyDocument::duplicate_keys`] so it can be reported.
//! - `.nan` and `.inf` have no JSON number form and decode as `null`, which
//!   every schema type in the corpus rejects with an ordinary violation.
//! - Tags are dropped and scalar mapping keys are rendered as strings.
//!
//! Only malformed YAML, several documents in one file, and collections used
//! as mapping keys are decode errors.

use std::fmt;

use serde::de::{self, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_json::{Map, Number, Value};
use taxo_schema::pointer_to_yaml_path;

/// A decoded taxonomy file.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyDocument {
    /// The document as JSON.
    pub value: Value,
    /// Keys that appeared more than once in the same mapping, in the order
    /// their repeats were read.
    pub duplicate_keys: Vec<DuplicateKey>,
}

/// A repeated mapping key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    /// The key as written.
    pub key: String,
    /// Dotted path to the key's value.
    pub yaml_path: String,
}

impl TaxonomyDocument {
    /// Decode `content` as a single YAML document.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed input, multi-document input, or
    /// a sequence or mapping used as a mapping key.
    pub fn decode(content: &str) -> Result<Self, serde_yaml::Error> {
        let mut repeats = Vec::new();
        let seed = ValueSeed {
            pointer: String::new(),
            repeats: &mut repeats,
        };
        let value = seed.deserialize(serde_yaml::Deserializer::from_str(content))?;
        let duplicate_keys = repeats
            .into_iter()
            .map(|(key, pointer)| DuplicateKey {
                yaml_path: pointer_to_yaml_path(&pointer, &value),
                key,
            })
            .collect();
        Ok(Self {
            value,
            duplicate_keys,
        })
    }

    /// Whether the document counts as empty: nothing at all, a falsy
    /// top-level scalar, or an empty collection.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }
}

/// Decodes one value, recording repeated keys below it. `pointer` is the
/// JSON Pointer of the value being decoded.
struct ValueSeed<'a> {
    pointer: String,
    repeats: &'a mut Vec<(String, String)>,
}

impl<'de> DeserializeSeed<'de> for ValueSeed<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ValueSeed<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Value, E> {
        Ok(float(v as f64))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
        Ok(float(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let ValueSeed { pointer, repeats } = self;
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        loop {
            let child = ValueSeed {
                pointer: format!("{pointer}/{}", items.len()),
                repeats: &mut *repeats,
            };
            match seq.next_element_seed(child)? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let ValueSeed { pointer, repeats } = self;
        let mut object = Map::new();
        while let Some(key) = map.next_key_seed(KeySeed)? {
            let child_pointer = format!("{pointer}/{}", key.replace('~', "~0").replace('/', "~1"));
            let child = ValueSeed {
                pointer: child_pointer.clone(),
                repeats: &mut *repeats,
            };
            let value = map.next_value_seed(child)?;
            if object.insert(key.clone(), value).is_some() {
                repeats.push((key, child_pointer));
            }
        }
        Ok(Value::Object(object))
    }

    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        // A tagged value: keep the value, drop the tag.
        let (_tag, value) = data.variant::<String>()?;
        value.newtype_variant_seed(self)
    }
}

fn float(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

/// Decodes a scalar mapping key as a string.
struct KeySeed;

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = String;

    fn deserialize<D>(self, deserializer: D) -> Result<String, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for KeySeed {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a scalar mapping key")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok("null".to_owned())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok("null".to_owned())
    }

    fn visit_enum<A>(self, data: A) -> Result<String, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (_tag, value) = data.variant::<String>()?;
        value.newtype_variant_seed(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(text: &str) -> TaxonomyDocument {
        TaxonomyDocument::decode(text).unwrap()
    }

    #[test]
    fn test_decodes_taxonomy_shapes() {
        let doc = decode(
            "version: 3\ncreated_by: someone\nenabled: true\nratio: 0.5\n\
             seed_examples:\n  - question: one\n    answer: two\n1: numeric key\n",
        );
        assert_eq!(doc.value["version"], 3);
        assert_eq!(doc.value["created_by"], "someone");
        assert_eq!(doc.value["enabled"], true);
        assert_eq!(doc.value["ratio"], 0.5);
        assert_eq!(doc.value["seed_examples"][0]["answer"], "two");
        assert_eq!(doc.value["1"], "numeric key");
        assert!(doc.duplicate_keys.is_empty());
    }

    #[test]
    fn test_non_finite_numbers_become_null() {
        let doc = decode("created_by: .nan\nratio: .inf\nfloor: -.inf\n");
        assert_eq!(doc.value, json!({"created_by": null, "ratio": null, "floor": null}));
    }

    #[test]
    fn test_repeated_keys_keep_the_last_value() {
        let doc = decode(
            "created_by: first\nseed_examples:\n  - question: a\n    question: b\ncreated_by: second\n",
        );
        assert_eq!(doc.value["created_by"], "second");
        assert_eq!(doc.value["seed_examples"][0]["question"], "b");
        assert_eq!(
            doc.duplicate_keys,
            [
                DuplicateKey {
                    key: "question".to_string(),
                    yaml_path: ".seed_examples[0].question".to_string(),
                },
                DuplicateKey {
                    key: "created_by".to_string(),
                    yaml_path: ".created_by".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_tags_are_dropped() {
        let doc = decode("created_by: !contributor someone\n");
        assert_eq!(doc.value["created_by"], "someone");
    }

    #[test]
    fn test_decode_errors() {
        assert!(TaxonomyDocument::decode("created_by: [unclosed\n").is_err());
        assert!(TaxonomyDocument::decode("a: 1\n---\nb: 2\n").is_err());
        assert!(TaxonomyDocument::decode("? [a, b]\n: value\n").is_err());
    }

    #[test]
    fn test_empty_documents() {
        for text in ["", "# only a comment\n", "~", "{}", "[]", "''", "false", "0"] {
            assert!(decode(text).is_empty(), "{text:?} should be empty");
        }
        for text in ["a: 1", "- 1", "text", "1", "true"] {
            assert!(!decode(text).is_empty(), "{text:?} should not be empty");
        }
    }
}
