// Copyright 2023 Remi Bernotavicius

//! Case-insensitive substring search. SQLite's `LIKE` ignores ASCII case,
//! which matches the contract here.

use super::food_items::FoodItemDetails;
use super::meals::MealDetails;
use super::recipes::RecipeDetails;
use crate::database;
use crate::database::models::{FoodItem, Ingredient, Meal, Recipe};
use crate::error::Result;
use diesel::expression_methods::TextExpressionMethods as _;
use diesel::BoolExpressionMethods as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

/// The federated search returns at most this many hits per entity type.
const PER_TYPE_LIMIT: usize = 5;

#[derive(Debug)]
pub struct SearchResults {
    pub recipes: Vec<RecipeDetails>,
    pub meals: Vec<MealDetails>,
    pub food_items: Vec<FoodItemDetails>,
    pub ingredients: Vec<Ingredient>,
}

fn pattern(query: &str) -> String {
    format!("%{query}%")
}

pub fn recipes(conn: &mut database::Connection, query: &str) -> Result<Vec<RecipeDetails>> {
    use database::schema::recipes::dsl::*;

    let matches = recipes
        .filter(name.like(pattern(query)))
        .select(Recipe::as_select())
        .order(name.asc())
        .load(conn)?;
    super::recipes::details_for(conn, matches)
}

pub fn meals(conn: &mut database::Connection, query: &str) -> Result<Vec<MealDetails>> {
    use database::schema::meals::dsl::*;

    let matches = meals
        .filter(
            name.like(pattern(query))
                .or(description.like(pattern(query))),
        )
        .select(Meal::as_select())
        .order(name.asc())
        .load(conn)?;
    super::meals::details_for(conn, matches)
}

pub fn food_items(conn: &mut database::Connection, query: &str) -> Result<Vec<FoodItemDetails>> {
    use database::schema::food_items::dsl::*;

    let matches = food_items
        .filter(
            name.like(pattern(query))
                .or(description.like(pattern(query))),
        )
        .select(FoodItem::as_select())
        .order(name.asc())
        .load(conn)?;
    super::food_items::details_for(conn, matches)
}

pub fn ingredients(conn: &mut database::Connection, query: &str) -> Result<Vec<Ingredient>> {
    use database::schema::ingredients::dsl::*;

    Ok(ingredients
        .filter(
            name.like(pattern(query))
                .or(description.like(pattern(query))),
        )
        .select(Ingredient::as_select())
        .order(name.asc())
        .load(conn)?)
}

/// One query per entity type, each capped independently; no global ranking.
pub fn everything(conn: &mut database::Connection, query: &str) -> Result<SearchResults> {
    let mut results = SearchResults {
        recipes: recipes(conn, query)?,
        meals: meals(conn, query)?,
        food_items: food_items(conn, query)?,
        ingredients: ingredients(conn, query)?,
    };
    results.recipes.truncate(PER_TYPE_LIMIT);
    results.meals.truncate(PER_TYPE_LIMIT);
    results.food_items.truncate(PER_TYPE_LIMIT);
    results.ingredients.truncate(PER_TYPE_LIMIT);
    Ok(results)
}
