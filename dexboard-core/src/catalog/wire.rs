//! GraphQL wire format of the catalog query
//!
//! Saved responses on disk and live responses from the endpoint share this
//! shape, so both sources decode through [`parse_response`].

use serde::Deserialize;
use serde_json::Value;

use super::{CatalogEntry, EntryId};
use crate::{DexboardError, Result};

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<QueryError>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(rename = "pokemon_v2_pokemon", default)]
    entries: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
struct WireEntry {
    id: EntryId,
    name: String,
    #[serde(rename = "pokemon_v2_pokemontypes", default)]
    types: Vec<WireTypeSlot>,
    #[serde(rename = "pokemon_v2_pokemonsprites", default)]
    sprites: Vec<WireSprites>,
}

#[derive(Debug, Deserialize)]
struct WireTypeSlot {
    #[serde(rename = "pokemon_v2_type")]
    kind: Option<WireType>,
}

#[derive(Debug, Deserialize)]
struct WireType {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireSprites {
    #[serde(default)]
    sprites: Value,
}

impl From<WireEntry> for CatalogEntry {
    fn from(wire: WireEntry) -> Self {
        let categories = wire
            .types
            .into_iter()
            .filter_map(|slot| slot.kind.map(|kind| kind.name))
            .collect();

        // Older deployments return the sprites column as a JSON string, newer
        // ones as an object. Either way the engine receives raw text.
        let media_payload = wire
            .sprites
            .into_iter()
            .next()
            .and_then(|row| match row.sprites {
                Value::Null => None,
                Value::String(text) => Some(text),
                other => Some(other.to_string()),
            });

        CatalogEntry {
            id: wire.id,
            name: wire.name,
            categories,
            media_payload,
        }
    }
}

/// GraphQL text of the catalog query
pub fn catalog_query(limit: usize) -> String {
    format!(
        "query GetCatalog {{ pokemon_v2_pokemon(limit: {limit}, order_by: {{id: asc}}) {{ \
         id name pokemon_v2_pokemontypes {{ pokemon_v2_type {{ name }} }} \
         pokemon_v2_pokemonsprites {{ sprites }} }} }}"
    )
}

/// Decode a catalog query response body
///
/// A response carrying an `errors` array is rejected even when partial data
/// is present.
pub fn parse_response(body: &str) -> Result<Vec<CatalogEntry>> {
    let response: QueryResponse = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(DexboardError::Query(messages.join("; ")));
    }

    let data = response
        .data
        .ok_or_else(|| DexboardError::Query("response carried no data".to_string()))?;

    Ok(data.entries.into_iter().map(CatalogEntry::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_string_and_object_sprites() {
        let body = r#"{
            "data": {
                "pokemon_v2_pokemon": [
                    {
                        "id": 1,
                        "name": "bulbasaur",
                        "pokemon_v2_pokemontypes": [
                            {"pokemon_v2_type": {"name": "grass"}},
                            {"pokemon_v2_type": {"name": "poison"}}
                        ],
                        "pokemon_v2_pokemonsprites": [{"sprites": "{\"front_default\":\"a.png\"}"}]
                    },
                    {
                        "id": 4,
                        "name": "charmander",
                        "pokemon_v2_pokemontypes": [{"pokemon_v2_type": {"name": "fire"}}],
                        "pokemon_v2_pokemonsprites": [{"sprites": {"front_default": "b.png"}}]
                    }
                ]
            }
        }"#;

        let entries = parse_response(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].categories, vec!["grass", "poison"]);
        assert_eq!(
            entries[0].media_payload.as_deref(),
            Some(r#"{"front_default":"a.png"}"#)
        );
        assert_eq!(
            entries[1].media_payload.as_deref(),
            Some(r#"{"front_default":"b.png"}"#)
        );
    }

    #[test]
    fn test_missing_sprites_row_is_none() {
        let body = r#"{"data":{"pokemon_v2_pokemon":[
            {"id":7,"name":"squirtle","pokemon_v2_pokemontypes":[],"pokemon_v2_pokemonsprites":[]},
            {"id":8,"name":"wartortle","pokemon_v2_pokemonsprites":[{"sprites":null}]}
        ]}}"#;

        let entries = parse_response(body).unwrap();
        assert!(entries.iter().all(|e| e.media_payload.is_none()));
        assert!(entries[1].categories.is_empty());
    }

    #[test]
    fn test_graphql_errors_are_rejected() {
        let body = r#"{"errors":[{"message":"field not found"},{"message":"bad limit"}]}"#;
        let err = parse_response(body).unwrap_err();
        assert!(matches!(err, DexboardError::Query(ref m) if m == "field not found; bad limit"));
    }

    #[test]
    fn test_missing_data_is_rejected() {
        assert!(matches!(parse_response("{}"), Err(DexboardError::Query(_))));
        assert!(matches!(
            parse_response("not json"),
            Err(DexboardError::CatalogParse(_))
        ));
    }

    #[test]
    fn test_query_embeds_limit() {
        let query = catalog_query(24);
        assert!(query.contains("limit: 24"));
        assert!(query.contains("order_by: {id: asc}"));
    }
}
