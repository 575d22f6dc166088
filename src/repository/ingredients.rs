// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Category, CategoryId, Ingredient, IngredientId};
use crate::error::{Result, StoreError};
use diesel::prelude::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::prelude::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct IngredientChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub category_ids: Option<Vec<CategoryId>>,
}

#[derive(diesel::AsChangeset)]
#[diesel(table_name = crate::database::schema::ingredients)]
struct ScalarChanges<'a> {
    name: Option<&'a str>,
    description: Option<&'a str>,
    notes: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct IngredientDetails {
    pub ingredient: Ingredient,
    pub categories: Vec<Category>,
}

pub fn all(conn: &mut database::Connection) -> Result<Vec<Ingredient>> {
    use database::schema::ingredients::dsl::*;

    Ok(ingredients
        .select(Ingredient::as_select())
        .order(name.asc())
        .load(conn)?)
}

pub fn get(
    conn: &mut database::Connection,
    fetch_id: IngredientId,
) -> Result<Option<IngredientDetails>> {
    use database::schema::ingredients::dsl::*;

    let Some(ingredient) = ingredients
        .find(fetch_id)
        .select(Ingredient::as_select())
        .get_result(conn)
        .optional()?
    else {
        return Ok(None);
    };

    Ok(Some(IngredientDetails {
        categories: categories_of(conn, fetch_id)?,
        ingredient,
    }))
}

pub fn categories_of(
    conn: &mut database::Connection,
    of: IngredientId,
) -> Result<Vec<Category>> {
    use database::schema::ingredient_categories::dsl::*;

    Ok(ingredient_categories
        .inner_join(database::schema::categories::table)
        .filter(ingredient_id.eq(of))
        .select(Category::as_select())
        .load(conn)?)
}

fn replace_categories(
    conn: &mut database::Connection,
    of: IngredientId,
    new_category_ids: &[CategoryId],
) -> Result<()> {
    use database::schema::ingredient_categories::dsl::*;
    use diesel::{delete, insert_into};

    delete(ingredient_categories.filter(ingredient_id.eq(of))).execute(conn)?;
    for new_category_id in new_category_ids.iter().copied() {
        insert_into(ingredient_categories)
            .values((ingredient_id.eq(of), category_id.eq(new_category_id)))
            .execute(conn)?;
    }
    Ok(())
}

pub fn create(
    conn: &mut database::Connection,
    new_ingredient: NewIngredient,
) -> Result<IngredientDetails> {
    use diesel::insert_into;

    if new_ingredient.name.trim().is_empty() {
        return Err(StoreError::validation("ingredient name must not be empty"));
    }

    conn.transaction(|conn| {
        let ingredient: Ingredient = {
            use database::schema::ingredients::dsl::*;

            insert_into(ingredients)
                .values((
                    name.eq(new_ingredient.name),
                    description.eq(new_ingredient.description),
                    notes.eq(new_ingredient.notes),
                ))
                .returning(Ingredient::as_returning())
                .get_result(conn)?
        };
        replace_categories(conn, ingredient.id, &new_ingredient.category_ids)?;

        Ok(IngredientDetails {
            categories: categories_of(conn, ingredient.id)?,
            ingredient,
        })
    })
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: IngredientId,
    changes: IngredientChanges,
) -> Result<Option<IngredientDetails>> {
    if let Some(new_name) = &changes.name {
        if new_name.trim().is_empty() {
            return Err(StoreError::validation("ingredient name must not be empty"));
        }
    }

    conn.transaction(|conn| {
        let updated: Option<Ingredient> = {
            use database::schema::ingredients::dsl::*;
            use diesel::update;

            let scalar = ScalarChanges {
                name: changes.name.as_deref(),
                description: changes.description.as_deref(),
                notes: changes.notes.as_deref(),
            };
            update(ingredients.find(edit_id))
                .set((scalar, updated_at.eq(super::now())))
                .returning(Ingredient::as_returning())
                .get_result(conn)
                .optional()?
        };
        let Some(ingredient) = updated else {
            return Ok(None);
        };

        if let Some(new_category_ids) = &changes.category_ids {
            replace_categories(conn, edit_id, new_category_ids)?;
        }

        Ok(Some(IngredientDetails {
            categories: categories_of(conn, edit_id)?,
            ingredient,
        }))
    })
}

pub fn delete(conn: &mut database::Connection, delete_id: IngredientId) -> Result<bool> {
    use database::schema::ingredients::dsl::*;
    use diesel::delete;

    Ok(delete(ingredients.find(delete_id)).execute(conn)? > 0)
}
