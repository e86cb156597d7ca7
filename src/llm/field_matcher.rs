//! LLM-driven field discovery, profile matching, and biodata extraction.
//!
//! Every call degrades gracefully: unparseable discovery output yields an
//! empty field list, unparseable matching output falls back to a synonym
//! table over the profile map, and unparseable biodata gets one repair pass
//! before giving up.

use crate::core::FillResult;
use crate::fill::FillInstruction;
use crate::llm::{
    LlmClient, biodata_messages, extract_json_object, fillable_fields_messages,
    match_fields_messages, repair_messages,
};
use crate::profile::Biodata;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A fillable field discovered on a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillableField {
    /// Field name exactly as it appears on the document.
    pub field_name: String,
    /// Loose type hint (text, date, phone, ...).
    #[serde(default)]
    pub field_type: String,
    /// What the field expects.
    #[serde(default)]
    pub description: String,
    /// Whether the document marks the field as required.
    #[serde(default)]
    pub required: bool,
}

/// A document field matched to a profile field, with its value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedField {
    /// The document-side field name.
    pub pdf_field: String,
    /// The profile-side field name.
    pub profile_field: String,
    /// The value to place on the document.
    pub value: String,
    /// Match confidence in [0, 1].
    #[serde(default)]
    pub confidence: f64,
}

/// Synonym table used when the matching call cannot be parsed. Maps
/// lowercase document-label spellings to profile field names.
fn synonym_table() -> &'static [(&'static str, &'static str)] {
    &[
        ("name", "name"),
        ("applicant name", "name"),
        ("contact name", "name"),
        ("full name", "name"),
        ("first name", "first_name"),
        ("last name", "last_name"),
        ("phone", "mobile_no"),
        ("phone no.", "mobile_no"),
        ("phone number", "mobile_no"),
        ("mobile", "mobile_no"),
        ("mobile no", "mobile_no"),
        ("company", "company"),
        ("organization", "company"),
        ("name of company", "company"),
        ("address", "address"),
        ("email", "email_id"),
        ("email address", "email_id"),
        ("email id", "email_id"),
        ("date of birth", "date_of_birth"),
        ("dob", "date_of_birth"),
        ("age", "age"),
        ("gender", "gender"),
        ("sex", "gender"),
        ("experience", "experience"),
        ("designation", "designation"),
        ("date", "date"),
    ]
}

/// Drives the three LLM tasks against a single client.
pub struct FieldMatcher {
    client: LlmClient,
}

impl FieldMatcher {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Discovers the fillable fields on a document from its OCR text.
    ///
    /// An unparseable response is logged and yields an empty list; the
    /// caller can still fill nothing rather than abort the document.
    pub fn extract_fillable_fields(&self, document_text: &str) -> FillResult<Vec<FillableField>> {
        let content = self
            .client
            .chat(&fillable_fields_messages(document_text), false)?;

        let Some(parsed) = extract_json_object(&content) else {
            warn!("fillable-field response not parseable as JSON; assuming no fields");
            return Ok(Vec::new());
        };

        let fields: Vec<FillableField> = parsed
            .get("fillable_fields")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .unwrap_or_else(|e| {
                warn!("fillable_fields did not match the expected shape: {}", e);
                None
            })
            .unwrap_or_default();

        info!("discovered {} fillable fields", fields.len());
        Ok(fields)
    }

    /// Matches discovered fields against a profile map, extracting values.
    ///
    /// Falls back to the synonym table when the response cannot be parsed,
    /// so a flaky provider still produces the common matches.
    pub fn match_profile_fields(
        &self,
        fillable: &[FillableField],
        profile_map: &BTreeMap<String, String>,
    ) -> FillResult<Vec<MatchedField>> {
        if fillable.is_empty() || profile_map.is_empty() {
            return Ok(Vec::new());
        }

        let fillable_json = json!({ "fillable_fields": fillable });
        let profile_json = serde_json::to_value(profile_map)?;
        let content = self
            .client
            .chat(&match_fields_messages(&fillable_json, &profile_json), false)?;

        if let Some(parsed) = extract_json_object(&content) {
            if let Some(matched) = parsed.get("matched_fields").cloned() {
                match serde_json::from_value::<Vec<MatchedField>>(matched) {
                    Ok(matches) => {
                        let matches: Vec<MatchedField> = matches
                            .into_iter()
                            .filter(|m| !m.value.trim().is_empty())
                            .collect();
                        info!("LLM matched {} fields", matches.len());
                        return Ok(matches);
                    }
                    Err(e) => warn!("matched_fields did not match the expected shape: {}", e),
                }
            }
        }

        warn!("field matching response unusable; falling back to synonym table");
        Ok(fallback_match(fillable, profile_map))
    }

    /// Turns matched fields into fill instructions (label variants derived
    /// from the document-side field name).
    pub fn to_instructions(&self, matches: &[MatchedField]) -> Vec<FillInstruction> {
        matches
            .iter()
            .map(|m| FillInstruction::new(m.pdf_field.clone(), m.value.clone()))
            .collect()
    }

    /// Extracts biodata from source-document text, with one repair pass
    /// when the first response does not parse into the schema.
    pub fn extract_biodata(&self, document_text: &str) -> FillResult<Option<Biodata>> {
        let content = self.client.chat(&biodata_messages(document_text), true)?;

        if let Some(biodata) = parse_biodata(&content) {
            return Ok(Some(biodata));
        }

        debug!("biodata response not parseable; attempting one repair pass");
        let repaired = self.client.chat(&repair_messages(&content), true)?;
        match parse_biodata(&repaired) {
            Some(biodata) => Ok(Some(biodata)),
            None => {
                warn!("biodata extraction failed even after repair");
                Ok(None)
            }
        }
    }
}

fn parse_biodata(content: &str) -> Option<Biodata> {
    let value = extract_json_object(content)?;
    serde_json::from_value(normalize_biodata_value(value)).ok()
}

/// Coerces schema-adjacent values (numbers for age, nested scalars in
/// additional_fields) into the string-typed biodata shape.
fn normalize_biodata_value(mut value: Value) -> Value {
    let Some(object) = value.as_object_mut() else {
        return value;
    };
    for (_, field) in object.iter_mut() {
        match field {
            Value::Number(n) => *field = Value::String(n.to_string()),
            Value::Object(extras) => {
                for (_, extra) in extras.iter_mut() {
                    if let Value::Number(n) = extra {
                        *extra = Value::String(n.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    value
}

fn fallback_match(
    fillable: &[FillableField],
    profile_map: &BTreeMap<String, String>,
) -> Vec<MatchedField> {
    let mut matches = Vec::new();
    for field in fillable {
        let key = field
            .field_name
            .trim()
            .trim_end_matches(':')
            .to_lowercase();
        let profile_field = synonym_table()
            .iter()
            .find(|(label, _)| *label == key)
            .map(|(_, profile)| *profile)
            // Direct hit on a profile key (additional_fields land here).
            .or_else(|| profile_map.contains_key(key.as_str()).then_some(key.as_str()));

        if let Some(profile_field) = profile_field {
            if let Some(value) = profile_map.get(profile_field) {
                matches.push(MatchedField {
                    pdf_field: field.field_name.clone(),
                    profile_field: profile_field.to_string(),
                    value: value.clone(),
                    confidence: 0.8,
                });
            }
        }
    }
    matches
}
