// SPDX-FileCopyrightText: 2026 Lagoon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static entitlement table keyed by user class.

use lagoon_core::UserType;

/// Limits granted to one user class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entitlement {
    /// Quota-consuming actions allowed per rolling day.
    pub max_messages_per_day: u32,
    /// Chat model ids this class may select.
    pub available_chat_model_ids: &'static [&'static str],
}

const ALL_CHAT_MODELS: &[&str] = &[
    "chat-model",
    "fastest-model",
    "code-model",
    "vision-model",
    "uncensored-model",
    "chat-model-reasoning",
];

/// Users without an account.
pub const GUEST: Entitlement = Entitlement {
    max_messages_per_day: 10,
    available_chat_model_ids: ALL_CHAT_MODELS,
};

/// Users with an account.
pub const REGULAR: Entitlement = Entitlement {
    max_messages_per_day: 50,
    available_chat_model_ids: ALL_CHAT_MODELS,
};

/// Users with an account and a paid membership.
pub const PREMIUM: Entitlement = Entitlement {
    max_messages_per_day: 500,
    available_chat_model_ids: ALL_CHAT_MODELS,
};

/// Entitlement record for a known user class.
pub fn entitlement(user_type: UserType) -> &'static Entitlement {
    match user_type {
        UserType::Guest => &GUEST,
        UserType::Regular => &REGULAR,
        UserType::Premium => &PREMIUM,
    }
}

/// Look up the entitlement for a raw user class string.
///
/// Returns `None` for any class outside the table; callers must treat that as
/// "no entitlement" and deny.
pub fn entitlements_for(user_type: &str) -> Option<&'static Entitlement> {
    user_type.parse::<UserType>().ok().map(entitlement)
}
