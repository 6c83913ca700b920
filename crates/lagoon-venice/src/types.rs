// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Venice.ai API request/response types.
//!
//! Only the fields Lagoon reads are modelled; everything else in the provider's
//! payloads is ignored during deserialization.

use lagoon_core::types::ModelTraits;
use serde::{Deserialize, Serialize};

// --- Model catalog ---

/// Response of `GET /models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsResponse {
    pub data: Vec<VeniceModel>,
}

/// One model entry in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct VeniceModel {
    pub id: String,
    /// Model family, e.g. "text" or "image".
    #[serde(rename = "type")]
    pub model_type: String,
    pub model_spec: ModelSpec,
}

/// Descriptive part of a catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub capabilities: Capabilities,
}

/// Capability flags; absent flags read as false.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(default)]
    pub optimized_for_code: bool,
    #[serde(default)]
    pub supports_vision: bool,
    #[serde(default)]
    pub supports_reasoning: bool,
    #[serde(default)]
    pub supports_function_calling: bool,
}

impl VeniceModel {
    pub fn has_trait(&self, name: &str) -> bool {
        self.model_spec.traits.iter().any(|t| t == name)
    }

    /// Online model of the given family.
    pub fn is_available(&self, model_type: &str) -> bool {
        self.model_type == model_type && !self.model_spec.offline
    }
}

/// Response of `GET /models/traits`.
#[derive(Debug, Clone, Deserialize)]
pub struct TraitsResponse {
    pub data: ModelTraits,
}

/// Response of `GET /image/styles`.
#[derive(Debug, Clone, Deserialize)]
pub struct StylesResponse {
    pub data: Vec<String>,
}

// --- Image generation ---

/// Body of `POST /image/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageGenerateRequest {
    pub model: String,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub return_binary: bool,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<String>,
    pub hide_watermark: bool,
    pub safe_mode: bool,
}

/// Extract the human-readable detail from a generation error body.
///
/// Prefers `issues[0].message`; otherwise the whole body serialized as JSON.
pub fn error_detail(body: &serde_json::Value) -> String {
    body.get("issues")
        .and_then(|issues| issues.get(0))
        .and_then(|issue| issue.get("message"))
        .and_then(serde_json::Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_entry_tolerates_missing_optional_fields() {
        let model: VeniceModel = serde_json::from_value(json!({
            "id": "llama-3.2-3b",
            "type": "text",
            "object": "model",
            "model_spec": {"name": "Llama 3.2 3B", "availableContextTokens": 131072}
        }))
        .unwrap();
        assert!(!model.model_spec.offline);
        assert!(model.model_spec.traits.is_empty());
        assert!(!model.model_spec.capabilities.supports_vision);
        assert!(model.is_available("text"));
        assert!(!model.is_available("image"));
    }

    #[test]
    fn capabilities_use_camel_case() {
        let caps: Capabilities = serde_json::from_value(json!({
            "optimizedForCode": true,
            "supportsVision": false,
            "supportsReasoning": true,
            "quantization": "fp8"
        }))
        .unwrap();
        assert!(caps.optimized_for_code);
        assert!(caps.supports_reasoning);
    }

    #[test]
    fn generate_request_omits_absent_style() {
        let req = ImageGenerateRequest {
            model: "venice-sd35".into(),
            prompt: "a cat".into(),
            width: 1024,
            height: 1024,
            return_binary: true,
            format: "png".into(),
            style_preset: None,
            hide_watermark: true,
            safe_mode: false,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("style_preset").is_none());
        assert_eq!(value["return_binary"], true);
        assert_eq!(value["safe_mode"], false);
    }

    #[test]
    fn error_detail_prefers_first_issue() {
        let body = json!({
            "issues": [{"message": "Prompt too long"}, {"message": "second"}],
            "error": "validation"
        });
        assert_eq!(error_detail(&body), "Prompt too long");
    }

    #[test]
    fn error_detail_without_issues_is_serialized_body() {
        let body = json!({"error": "Invalid model", "code": 42});
        assert_eq!(error_detail(&body), r#"{"error":"Invalid model","code":42}"#);
    }

    #[test]
    fn error_detail_with_empty_issues_is_serialized_body() {
        let body = json!({"issues": []});
        assert_eq!(error_detail(&body), r#"{"issues":[]}"#);
    }
}
