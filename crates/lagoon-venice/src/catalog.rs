// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model catalog shaping: chat model classification, static fallbacks, and
//! the time-boxed cache shared by every catalog fetcher.

use std::time::Duration;

use lagoon_core::types::{ChatModel, ImageModel, ModelTraits};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::types::{ModelsResponse, VeniceModel};

/// Display category of a text model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Fastest,
    Code,
    Vision,
    Uncensored,
    Reasoning,
    Default,
    General,
}

impl Category {
    /// Classify with precedence fastest > code > vision > uncensored >
    /// reasoning > default > general.
    pub fn of(model: &VeniceModel) -> Self {
        let caps = &model.model_spec.capabilities;
        if model.has_trait("fastest") {
            Category::Fastest
        } else if model.has_trait("default_code") || caps.optimized_for_code {
            Category::Code
        } else if caps.supports_vision {
            Category::Vision
        } else if model.has_trait("most_uncensored") {
            Category::Uncensored
        } else if model.has_trait("default_reasoning") || caps.supports_reasoning {
            Category::Reasoning
        } else if model.has_trait("default") {
            Category::Default
        } else {
            Category::General
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Fastest => "Fastest",
            Category::Code => "Code",
            Category::Vision => "Vision",
            Category::Uncensored => "Uncensored",
            Category::Reasoning => "Reasoning",
            Category::Default => "Default",
            Category::General => "General",
        }
    }

    fn description_suffix(self) -> Option<&'static str> {
        match self {
            Category::Fastest => Some("Ultra-fast responses"),
            Category::Code => Some("Optimized for programming"),
            Category::Vision => Some("Vision and multimodal"),
            Category::Uncensored => Some("Unrestricted generation"),
            Category::Reasoning => Some("Advanced reasoning"),
            Category::Default => Some("Balanced performance"),
            Category::General => None,
        }
    }
}

/// Map one catalog entry onto the picker's chat model shape.
pub fn classify(model: &VeniceModel) -> ChatModel {
    let category = Category::of(model);
    let name = &model.model_spec.name;
    let description = match category.description_suffix() {
        Some(suffix) => format!("{name} - {suffix}"),
        None => name.clone(),
    };
    ChatModel {
        id: model.id.clone(),
        name: category.label().to_string(),
        description,
        model_id: Some(model.id.clone()),
        model_trait: model.model_spec.traits.first().cloned(),
    }
}

/// Online text models, classified. May be empty.
pub fn chat_models_from(response: &ModelsResponse) -> Vec<ChatModel> {
    response
        .data
        .iter()
        .filter(|m| m.is_available("text"))
        .map(classify)
        .collect()
}

/// Online image models as `{id, name, description: ""}`.
pub fn image_models_from(response: &ModelsResponse) -> Vec<ImageModel> {
    response
        .data
        .iter()
        .filter(|m| m.is_available("image"))
        .map(|m| ImageModel {
            id: m.id.clone(),
            name: m.model_spec.name.clone(),
            description: String::new(),
        })
        .collect()
}

struct StaticChatModel {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    model_id: &'static str,
    model_trait: Option<&'static str>,
}

const STATIC_CHAT_MODELS: &[StaticChatModel] = &[
    StaticChatModel {
        id: "chat-model",
        name: "Default",
        description: "Llama 3.3 70B - Balanced performance for general tasks",
        model_id: "llama-3.3-70b",
        model_trait: Some("default"),
    },
    StaticChatModel {
        id: "fastest-model",
        name: "Fastest",
        description: "Llama 3.2 3B - Ultra-fast responses for simple queries",
        model_id: "llama-3.2-3b",
        model_trait: Some("fastest"),
    },
    StaticChatModel {
        id: "code-model",
        name: "Code",
        description: "Qwen 3 Coder 235B - Optimized for programming tasks",
        model_id: "qwen-3-235b",
        model_trait: Some("default_code"),
    },
    StaticChatModel {
        id: "vision-model",
        name: "Vision",
        description: "Mistral 3.1 24B - Advanced vision and multimodal capabilities",
        model_id: "mistral-31-24b",
        model_trait: Some("default_vision"),
    },
    StaticChatModel {
        id: "uncensored-model",
        name: "Uncensored",
        description: "TavonnAI Uncensored - Unrestricted content generation",
        model_id: "venice-uncensored",
        model_trait: None,
    },
    StaticChatModel {
        id: "chat-model-reasoning",
        name: "Reasoning",
        description: "DeepSeek R1 671B - Advanced reasoning with chain-of-thought",
        model_id: "deepseek-r1-671b",
        model_trait: Some("default_reasoning"),
    },
];

/// The six chat models served when the provider catalog is unusable.
pub fn static_chat_models() -> Vec<ChatModel> {
    STATIC_CHAT_MODELS
        .iter()
        .map(|m| ChatModel {
            id: m.id.to_string(),
            name: m.name.to_string(),
            description: m.description.to_string(),
            model_id: Some(m.model_id.to_string()),
            model_trait: m.model_trait.map(str::to_string),
        })
        .collect()
}

/// Trait mapping served when the provider's traits endpoint is unusable.
pub fn default_traits() -> ModelTraits {
    ModelTraits {
        default: Some("llama-3.3-70b".into()),
        fastest: Some("llama-3.2-3b".into()),
        default_code: Some("qwen-2.5-coder-32b".into()),
        default_vision: Some("mistral-31-24b".into()),
        default_reasoning: Some("deepseek-r1-671b".into()),
        most_intelligent: None,
        most_uncensored: None,
    }
}

/// Single-value cache that expires `ttl` after the last store.
///
/// Only callers decide what is worth storing; failures and fallbacks are
/// simply never put.
pub struct TtlCache<T> {
    ttl: Duration,
    slot: RwLock<Option<(Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// The cached value, if it is younger than the TTL.
    pub async fn get(&self) -> Option<T> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub async fn put(&self, value: T) {
        *self.slot.write().await = Some((Instant::now(), value));
    }

    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}
