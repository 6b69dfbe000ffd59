//! Translation between [`Value`]/[`Query`] and the Firestore REST JSON shapes.

use crate::document::{Direction, Document, Fields, Query, Value};
use crate::error::{Result, StoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Value as Json, json};

/// Document resource as returned by `GET` and `runQuery`
#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Json>,
}

/// One element of the `runQuery` response array. Entries without a
/// document only carry progress metadata.
#[derive(Debug, Deserialize)]
pub(crate) struct RunQueryEntry {
    pub document: Option<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the human-readable message out of a Firestore error body
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

pub(crate) fn decode_document(raw: RawDocument) -> Result<Document> {
    // name: projects/{p}/databases/{d}/documents/{collection}/{id}
    let id = raw
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::Decode(format!("document name without id: '{}'", raw.name)))?
        .to_string();

    Ok(Document::new(id, decode_fields(&raw.fields)?))
}

pub(crate) fn decode_fields(fields: &Map<String, Json>) -> Result<Fields> {
    fields
        .iter()
        .map(|(name, value)| decode_value(value).map(|v| (name.clone(), v)))
        .collect()
}

pub(crate) fn decode_value(json: &Json) -> Result<Value> {
    let object = json
        .as_object()
        .ok_or_else(|| StoreError::Decode(format!("expected value object, got {}", json)))?;

    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| StoreError::Decode("empty value object".to_string()))?;

    let bad = || StoreError::Decode(format!("invalid {}: {}", kind, inner));

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Boolean).ok_or_else(bad),
        // int64 travels as a JSON string
        "integerValue" => match inner {
            Json::String(s) => s.parse().map(Value::Integer).map_err(|_| bad()),
            Json::Number(n) => n.as_i64().map(Value::Integer).ok_or_else(bad),
            _ => Err(bad()),
        },
        "doubleValue" => match inner {
            Json::Number(n) => n.as_f64().map(Value::Double).ok_or_else(bad),
            Json::String(s) => s.parse().map(Value::Double).map_err(|_| bad()),
            _ => Err(bad()),
        },
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
            .ok_or_else(bad),
        "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(bad),
        "arrayValue" => match inner.get("values") {
            None => Ok(Value::Array(Vec::new())),
            Some(Json::Array(values)) => values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Some(_) => Err(bad()),
        },
        "mapValue" => match inner.get("fields") {
            None => Ok(Value::Map(Fields::new())),
            Some(Json::Object(fields)) => decode_fields(fields).map(Value::Map),
            Some(_) => Err(bad()),
        },
        "geoPointValue" => {
            let coord = |name: &str| inner.get(name).and_then(Json::as_f64).unwrap_or(0.0);
            let mut fields = Fields::new();
            fields.insert("latitude".to_string(), Value::Double(coord("latitude")));
            fields.insert("longitude".to_string(), Value::Double(coord("longitude")));
            Ok(Value::Map(fields))
        }
        other => Err(StoreError::Decode(format!("unknown value kind '{}'", other))),
    }
}

pub(crate) fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Boolean(b) => json!({ "booleanValue": b }),
        Value::Integer(i) => json!({ "integerValue": i.to_string() }),
        Value::Double(d) => json!({ "doubleValue": d }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Timestamp(t) => {
            json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::AutoSi, true) })
        }
        Value::Array(values) => {
            json!({ "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Map(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

pub(crate) fn encode_fields(fields: &Fields) -> Json {
    Json::Object(
        fields
            .iter()
            .map(|(name, value)| (name.clone(), encode_value(value)))
            .collect(),
    )
}

/// Body for `POST documents:runQuery`
pub(crate) fn encode_query(collection: &str, query: &Query) -> Json {
    let mut structured = Map::new();
    structured.insert("from".to_string(), json!([{ "collectionId": collection }]));

    if let Some(filter) = &query.filter {
        structured.insert(
            "where".to_string(),
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": filter.field },
                    "op": "EQUAL",
                    "value": encode_value(&filter.value)
                }
            }),
        );
    }

    if let Some(order) = &query.order_by {
        let direction = match order.direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        structured.insert(
            "orderBy".to_string(),
            json!([{ "field": { "fieldPath": order.field }, "direction": direction }]),
        );
    }

    if let Some(limit) = query.limit {
        structured.insert("limit".to_string(), json!(limit));
    }

    json!({ "structuredQuery": structured })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_document_from_get_response() {
        let body = r#"{
            "name": "projects/ai-job-spot/databases/(default)/documents/jobs/Xy12AbC",
            "fields": {
                "title": { "stringValue": "Data Scientist" },
                "postedDate": { "timestampValue": "2025-06-25T09:15:00.123456Z" },
                "tags": { "arrayValue": { "values": [
                    { "stringValue": "Data Science" },
                    { "stringValue": "Analytics" }
                ] } },
                "views": { "integerValue": "42" },
                "salaryRange": { "nullValue": null }
            },
            "createTime": "2025-06-25T09:15:01Z",
            "updateTime": "2025-06-25T09:15:01Z"
        }"#;

        let raw: RawDocument = serde_json::from_str(body).unwrap();
        let doc = decode_document(raw).unwrap();

        assert_eq!(doc.id, "Xy12AbC");
        assert_eq!(doc.get("title"), Some(&Value::from("Data Scientist")));
        assert_eq!(doc.get("views"), Some(&Value::Integer(42)));
        assert_eq!(doc.get("salaryRange"), Some(&Value::Null));
        assert_eq!(
            doc.string_array("tags").unwrap(),
            vec!["Data Science", "Analytics"]
        );
        match doc.get("postedDate") {
            Some(Value::Timestamp(t)) => {
                assert_eq!(t.date_naive().to_string(), "2025-06-25");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_run_query_response_skips_metadata_entries() {
        let body = r#"[
            { "readTime": "2025-07-04T00:00:00Z" }
        ]"#;
        let entries: Vec<RunQueryEntry> = serde_json::from_str(body).unwrap();
        assert!(entries.into_iter().all(|e| e.document.is_none()));
    }

    #[test]
    fn test_decode_empty_array_and_map() {
        assert_eq!(
            decode_value(&json!({ "arrayValue": {} })).unwrap(),
            Value::Array(vec![])
        );
        assert_eq!(
            decode_value(&json!({ "mapValue": {} })).unwrap(),
            Value::Map(Fields::new())
        );
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        assert!(decode_value(&json!({ "vectorValue": {} })).is_err());
        assert!(decode_value(&json!("bare string")).is_err());
        assert!(decode_value(&json!({ "timestampValue": "yesterday" })).is_err());
    }

    #[test]
    fn test_encode_decode_timestamp_and_array() {
        let stamp = Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap();
        let value = Value::Array(vec![Value::Timestamp(stamp), Value::Integer(-7)]);
        let encoded = encode_value(&value);

        assert_eq!(
            encoded["arrayValue"]["values"][0]["timestampValue"],
            "2025-07-01T10:00:00Z"
        );
        assert_eq!(encoded["arrayValue"]["values"][1]["integerValue"], "-7");
        assert_eq!(decode_value(&encoded).unwrap(), value);
    }

    #[test]
    fn test_encode_slug_query() {
        let query = Query::new().where_eq("slug", "the-rise-of-generative-ai").limit(1);
        let body = encode_query("articles", &query);

        let structured = &body["structuredQuery"];
        assert_eq!(structured["from"][0]["collectionId"], "articles");
        assert_eq!(structured["where"]["fieldFilter"]["op"], "EQUAL");
        assert_eq!(structured["where"]["fieldFilter"]["field"]["fieldPath"], "slug");
        assert_eq!(
            structured["where"]["fieldFilter"]["value"]["stringValue"],
            "the-rise-of-generative-ai"
        );
        assert_eq!(structured["limit"], 1);
        assert!(structured.get("orderBy").is_none());
    }

    #[test]
    fn test_encode_listing_query() {
        let query = Query::new().order_by("postedDate", Direction::Descending);
        let body = encode_query("jobs", &query);

        let order = &body["structuredQuery"]["orderBy"][0];
        assert_eq!(order["field"]["fieldPath"], "postedDate");
        assert_eq!(order["direction"], "DESCENDING");
        assert!(body["structuredQuery"].get("where").is_none());
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(error_message(body), "Missing or insufficient permissions.");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }
}
