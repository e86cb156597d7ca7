//! Prompt construction for the three LLM tasks: fillable-field discovery,
//! profile-to-field matching, and biodata extraction (with its one repair
//! pass).

use crate::llm::ChatMessage;
use serde_json::{Value, json};

/// The exact biodata schema the extraction prompt demands.
pub fn biodata_schema() -> Value {
    json!({
        "name": null, "first_name": null, "last_name": null,
        "mobile_no": null, "email_id": null, "date_of_birth": null,
        "address": null, "designation": null, "company": null,
        "experience": null, "age": null, "gender": null,
        "additional_fields": {}
    })
}

const JSON_ONLY_SYSTEM: &str = "You output only a single JSON object matching the provided \
schema. Output must be valid json. No prose, no code fences, no explanations.";

/// Messages for the fillable-field discovery call over a document's OCR text.
pub fn fillable_fields_messages(document_text: &str) -> Vec<ChatMessage> {
    let prompt = format!(
        r#"Analyze the following document content and identify ALL fillable parameters/fields that a user might need to fill out.

Document content:
{document_text}

Return a JSON object with this structure:
{{
    "fillable_fields": [
        {{
            "field_name": "exact field name as it appears in the document",
            "field_type": "text/number/date/email/phone/address",
            "description": "brief description of what this field expects",
            "required": true
        }}
    ]
}}

Look for patterns like:
- Name fields (First Name, Last Name, Full Name)
- Contact information (Phone, Mobile, Email, Address)
- Personal details (Date of Birth, Age, Gender)
- Professional information (Designation, Company, Experience)
- Blank lines or spaces after labels
- Fields with underscores, dots, or brackets for filling

Return only valid JSON."#
    );
    vec![ChatMessage::user(prompt)]
}

/// Messages for the semantic matching call between discovered fields and a
/// stored profile.
pub fn match_fields_messages(fillable_fields: &Value, profile: &Value) -> Vec<ChatMessage> {
    let prompt = format!(
        r#"You are an expert at semantic field matching. Given fillable document fields and a user profile, identify which profile fields correspond to which document fields and extract their values.

Fillable document fields:
{fillable}

User profile:
{profile}

Tasks:
1. Match profile fields to document fields using semantic similarity.
2. Handle variations like "Phone" vs "Mobile", "Name" vs "Full Name".
3. Extract the actual values from the profile for matched fields.

IMPORTANT: Return ONLY a valid JSON object in this exact format, no explanations or code:
{{
    "matched_fields": [
        {{
            "pdf_field": "exact document field name",
            "profile_field": "matched profile field name",
            "value": "actual value from the profile",
            "confidence": 0.9
        }}
    ],
    "unmatched_pdf_fields": [],
    "unused_profile_fields": []
}}

Return ONLY the JSON object, nothing else."#,
        fillable = serde_json::to_string_pretty(fillable_fields).unwrap_or_default(),
        profile = serde_json::to_string_pretty(profile).unwrap_or_default(),
    );
    vec![ChatMessage::user(prompt)]
}

/// Messages for the biodata-extraction call over a source document's text.
///
/// The text is whitespace-collapsed and truncated so the request stays well
/// inside the context window.
pub fn biodata_messages(document_text: &str) -> Vec<ChatMessage> {
    let cleaned: String = document_text.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned: String = cleaned.chars().take(2500).collect();
    let schema = biodata_schema();

    let prompt = format!(
        r#"Extract biodata from the following text into this exact JSON schema.
Rules:
- Use null for missing fields.
- date_of_birth must be DD-MM-YYYY if present.
- Include country code in mobile_no if visible.
- If exam- or ticket-like fields appear (roll_no, application_no, exam_date, exam_center, subject), put them under additional_fields with clear keys.
Schema (keys and types to follow exactly): {schema}
Text: {cleaned}"#
    );

    vec![
        ChatMessage::system(JSON_ONLY_SYSTEM),
        ChatMessage::user(prompt),
    ]
}

/// Messages for the single repair pass: convert an unparseable response into
/// valid schema-conforming JSON.
pub fn repair_messages(bad_content: &str) -> Vec<ChatMessage> {
    let schema = biodata_schema();
    let prompt = format!(
        r#"Convert the following content into a valid JSON that matches this exact schema.
Do not add or remove keys; keep types consistent; return ONLY JSON.
Schema: {schema}
Content:
{bad_content}"#
    );

    vec![
        ChatMessage::system(JSON_ONLY_SYSTEM),
        ChatMessage::user(prompt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biodata_messages_truncate_input() {
        let long_text = "word ".repeat(2000);
        let messages = biodata_messages(&long_text);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        // Whole message stays bounded: schema + rules + 2500 chars of text.
        assert!(messages[1].content.len() < 4000);
    }

    #[test]
    fn test_schema_lists_all_standard_fields() {
        let schema = biodata_schema();
        let object = schema.as_object().unwrap();
        for key in [
            "name",
            "first_name",
            "last_name",
            "mobile_no",
            "email_id",
            "date_of_birth",
            "address",
            "designation",
            "company",
            "experience",
            "age",
            "gender",
            "additional_fields",
        ] {
            assert!(object.contains_key(key), "schema missing {key}");
        }
    }

    #[test]
    fn test_match_messages_embed_both_sides() {
        let fillable = serde_json::json!({"fillable_fields": [{"field_name": "Name"}]});
        let profile = serde_json::json!({"name": "John"});
        let messages = match_fields_messages(&fillable, &profile);
        assert!(messages[0].content.contains("\"field_name\": \"Name\""));
        assert!(messages[0].content.contains("\"name\": \"John\""));
    }
}
