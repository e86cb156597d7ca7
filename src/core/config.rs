//! Configuration types for the form-fill pipeline.
//!
//! All configuration structs are serde-enabled so a whole pipeline can be
//! described in a JSON file, and carry `Default` implementations plus
//! builder-style `with_*` methods for programmatic construction.

use crate::core::{FillResult, FormFillError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default chat-completions endpoint (Groq, OpenAI-compatible).
pub const DEFAULT_LLM_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model used for field extraction and matching.
pub const DEFAULT_LLM_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

/// Settings for the hosted language model used for semantic field matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completions endpoint URL.
    pub url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Bearer token. Empty string means "read from the GROQ_API_KEY env var".
    #[serde(default)]
    pub api_key: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: String::new(),
            temperature: 0.0,
            max_tokens: 2048,
            timeout_secs: 90,
        }
    }
}

impl LlmConfig {
    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Resolves the effective API key, consulting the environment when the
    /// configured key is empty.
    pub fn resolve_api_key(&self) -> FillResult<String> {
        if !self.api_key.is_empty() {
            return Ok(self.api_key.clone());
        }
        std::env::var("GROQ_API_KEY").map_err(|_| {
            FormFillError::config_error("no API key configured and GROQ_API_KEY is not set")
        })
    }
}

/// Settings for the OCR engine subprocess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Path to the tesseract binary. Defaults to "tesseract" on PATH.
    pub tesseract_path: String,
    /// Recognition language.
    pub language: String,
    /// Page segmentation mode passed as `--psm`.
    pub page_seg_mode: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
            page_seg_mode: 6,
        }
    }
}

/// Settings for the overlay fill pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    /// Fixed font size used for every drawn value.
    pub font_size: f32,
    /// Optional font file. When absent, common system font paths are probed.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    /// Rasterization DPI for the target document.
    pub dpi: u32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            font_size: 22.0,
            font_path: None,
            dpi: 200,
        }
    }
}

impl FillConfig {
    /// Sets the font file used for drawing values.
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Sets the rasterization DPI.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// OCR engine settings.
    #[serde(default)]
    pub ocr: OcrConfig,
    /// LLM settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Overlay fill settings.
    #[serde(default)]
    pub fill: FillConfig,
    /// Profile database path.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// CSV mirror path.
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            llm: LlmConfig::default(),
            fill: FillConfig::default(),
            db_path: default_db_path(),
            csv_path: default_csv_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("user_profile.db")
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("user_profile.csv")
}

impl PipelineConfig {
    /// Loads a pipeline configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> FillResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Validates settings that cannot be expressed in the type system.
    pub fn validate(&self) -> FillResult<()> {
        if self.fill.font_size <= 0.0 {
            return Err(FormFillError::config_error("font_size must be positive"));
        }
        if self.fill.dpi == 0 {
            return Err(FormFillError::config_error("dpi must be positive"));
        }
        Ok(())
    }
}
