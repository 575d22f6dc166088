// Copyright 2023 Remi Bernotavicius

//! Per-entity store operations. Reads return `Ok(None)` for an unknown id,
//! deletes return whether a row was removed, and every write that touches
//! more than one row runs inside a single transaction.

use chrono::NaiveDateTime;

pub mod categories;
pub mod food_items;
pub mod ingredients;
pub mod meals;
pub mod recipes;
pub mod search;
pub mod unit_types;

pub(crate) fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// For nullable fields in change payloads: a missing key deserializes to
/// `None` (leave alone), an explicit null to `Some(None)` (clear).
pub(crate) fn double_option<'de, T, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
