//! LLM integration: chat client, JSON recovery, prompts, and the field
//! matcher that drives discovery, matching, and biodata extraction.

pub mod client;
pub mod field_matcher;
pub mod json_extract;
pub mod prompts;

pub use client::{ChatMessage, LlmClient, extract_content};
pub use field_matcher::{FieldMatcher, FillableField, MatchedField};
pub use json_extract::extract_json_object;
pub use prompts::{
    biodata_messages, biodata_schema, fillable_fields_messages, match_fields_messages,
    repair_messages,
};
