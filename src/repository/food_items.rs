// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{FoodItem, FoodItemId, Recipe};
use crate::error::{Result, StoreError};
use diesel::ExpressionMethods as _;
use diesel::prelude::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize, Debug, Clone)]
pub struct NewFoodItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, diesel::AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::database::schema::food_items)]
pub struct FoodItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A food item together with the recipes that produce it.
#[derive(Debug, Clone)]
pub struct FoodItemDetails {
    pub food_item: FoodItem,
    pub recipes: Vec<Recipe>,
}

pub fn all(conn: &mut database::Connection) -> Result<Vec<FoodItemDetails>> {
    use database::schema::food_items::dsl::*;

    let items = food_items
        .select(FoodItem::as_select())
        .order(name.asc())
        .load(conn)?;
    details_for(conn, items)
}

pub fn get(
    conn: &mut database::Connection,
    fetch_id: FoodItemId,
) -> Result<Option<FoodItemDetails>> {
    use database::schema::food_items::dsl::*;

    let Some(item) = food_items
        .find(fetch_id)
        .select(FoodItem::as_select())
        .get_result(conn)
        .optional()?
    else {
        return Ok(None);
    };

    Ok(details_for(conn, vec![item])?.pop())
}

/// One extra query no matter how many parents were loaded.
pub(crate) fn details_for(
    conn: &mut database::Connection,
    items: Vec<FoodItem>,
) -> Result<Vec<FoodItemDetails>> {
    use database::schema::recipes::dsl::*;

    let ids: Vec<FoodItemId> = items.iter().map(|i| i.id).collect();
    let producing: Vec<Recipe> = recipes
        .filter(food_item_id.eq_any(ids))
        .select(Recipe::as_select())
        .load(conn)?;

    let mut by_item: HashMap<FoodItemId, Vec<Recipe>> = HashMap::new();
    for recipe in producing {
        by_item.entry(recipe.food_item_id).or_default().push(recipe);
    }

    Ok(items
        .into_iter()
        .map(|food_item| FoodItemDetails {
            recipes: by_item.remove(&food_item.id).unwrap_or_default(),
            food_item,
        })
        .collect())
}

pub fn create(
    conn: &mut database::Connection,
    new_item: NewFoodItem,
) -> Result<FoodItemDetails> {
    use database::schema::food_items::dsl::*;
    use diesel::insert_into;

    if new_item.name.trim().is_empty() {
        return Err(StoreError::validation("food item name must not be empty"));
    }

    let food_item = insert_into(food_items)
        .values((name.eq(new_item.name), description.eq(new_item.description)))
        .returning(FoodItem::as_returning())
        .get_result(conn)?;

    Ok(FoodItemDetails {
        food_item,
        recipes: vec![],
    })
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: FoodItemId,
    changes: FoodItemChanges,
) -> Result<Option<FoodItemDetails>> {
    use database::schema::food_items::dsl::*;
    use diesel::update;

    if let Some(new_name) = &changes.name {
        if new_name.trim().is_empty() {
            return Err(StoreError::validation("food item name must not be empty"));
        }
    }

    let updated: Option<FoodItem> = update(food_items.find(edit_id))
        .set((&changes, updated_at.eq(super::now())))
        .returning(FoodItem::as_returning())
        .get_result(conn)
        .optional()?;

    match updated {
        Some(item) => Ok(details_for(conn, vec![item])?.pop()),
        None => Ok(None),
    }
}

/// Takes the item's recipes, their ingredient lines, and its meal links with
/// it, per the schema's cascade rules.
pub fn delete(conn: &mut database::Connection, delete_id: FoodItemId) -> Result<bool> {
    use database::schema::food_items::dsl::*;
    use diesel::delete;

    Ok(delete(food_items.find(delete_id)).execute(conn)? > 0)
}
