// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Category, CategoryId, FoodItem, FoodItemId, Meal, MealId};
use crate::error::{Result, StoreError};
use diesel::prelude::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::prelude::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

#[derive(Deserialize, Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub food_item_ids: Vec<FoodItemId>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub food_item_ids: Option<Vec<FoodItemId>>,
    pub category_ids: Option<Vec<CategoryId>>,
}

#[derive(diesel::AsChangeset)]
#[diesel(table_name = crate::database::schema::meals)]
struct ScalarChanges<'a> {
    name: Option<&'a str>,
    description: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct MealDetails {
    pub meal: Meal,
    pub food_items: Vec<FoodItem>,
    pub categories: Vec<Category>,
}

/// A meal lists each food item at most once.
fn validate_food_item_ids(ids: &[FoodItemId]) -> Result<()> {
    let mut seen = HashSet::new();
    for food_item in ids {
        if !seen.insert(*food_item) {
            return Err(StoreError::Validation(format!(
                "food item {} listed more than once",
                food_item.0
            )));
        }
    }
    Ok(())
}

pub fn all(conn: &mut database::Connection) -> Result<Vec<MealDetails>> {
    use database::schema::meals::dsl::*;

    let parents = meals
        .select(Meal::as_select())
        .order(name.asc())
        .load(conn)?;
    details_for(conn, parents)
}

pub fn get(conn: &mut database::Connection, fetch_id: MealId) -> Result<Option<MealDetails>> {
    use database::schema::meals::dsl::*;

    let Some(meal) = meals
        .find(fetch_id)
        .select(Meal::as_select())
        .get_result(conn)
        .optional()?
    else {
        return Ok(None);
    };

    Ok(details_for(conn, vec![meal])?.pop())
}

pub(crate) fn details_for(
    conn: &mut database::Connection,
    parents: Vec<Meal>,
) -> Result<Vec<MealDetails>> {
    use database::schema::{categories, food_items, meal_categories, meal_food_items};

    let ids: Vec<MealId> = parents.iter().map(|m| m.id).collect();

    let item_rows: Vec<(MealId, FoodItem)> = meal_food_items::table
        .inner_join(food_items::table)
        .filter(meal_food_items::meal_id.eq_any(ids.iter().copied()))
        .select((meal_food_items::meal_id, FoodItem::as_select()))
        .order(meal_food_items::id.asc())
        .load(conn)?;
    let mut items_by_meal: HashMap<MealId, Vec<FoodItem>> = HashMap::new();
    for (of, item) in item_rows {
        items_by_meal.entry(of).or_default().push(item);
    }

    let category_rows: Vec<(MealId, Category)> = meal_categories::table
        .inner_join(categories::table)
        .filter(meal_categories::meal_id.eq_any(ids.iter().copied()))
        .select((meal_categories::meal_id, Category::as_select()))
        .load(conn)?;
    let mut categories_by_meal: HashMap<MealId, Vec<Category>> = HashMap::new();
    for (of, category) in category_rows {
        categories_by_meal.entry(of).or_default().push(category);
    }

    Ok(parents
        .into_iter()
        .map(|meal| MealDetails {
            food_items: items_by_meal.remove(&meal.id).unwrap_or_default(),
            categories: categories_by_meal.remove(&meal.id).unwrap_or_default(),
            meal,
        })
        .collect())
}

fn insert_food_item_links(
    conn: &mut database::Connection,
    of: MealId,
    new_food_item_ids: &[FoodItemId],
) -> Result<()> {
    use database::schema::meal_food_items::dsl::*;
    use diesel::insert_into;

    for new_food_item_id in new_food_item_ids.iter().copied() {
        insert_into(meal_food_items)
            .values((meal_id.eq(of), food_item_id.eq(new_food_item_id)))
            .execute(conn)?;
    }
    Ok(())
}

fn insert_category_links(
    conn: &mut database::Connection,
    of: MealId,
    new_category_ids: &[CategoryId],
) -> Result<()> {
    use database::schema::meal_categories::dsl::*;
    use diesel::insert_into;

    for new_category_id in new_category_ids.iter().copied() {
        insert_into(meal_categories)
            .values((meal_id.eq(of), category_id.eq(new_category_id)))
            .execute(conn)?;
    }
    Ok(())
}

pub fn create(conn: &mut database::Connection, new_meal: NewMeal) -> Result<MealDetails> {
    if new_meal.name.trim().is_empty() {
        return Err(StoreError::validation("meal name must not be empty"));
    }
    validate_food_item_ids(&new_meal.food_item_ids)?;

    conn.transaction(|conn| {
        let meal: Meal = {
            use database::schema::meals::dsl::*;
            use diesel::insert_into;

            insert_into(meals)
                .values((name.eq(new_meal.name), description.eq(new_meal.description)))
                .returning(Meal::as_returning())
                .get_result(conn)?
        };

        insert_food_item_links(conn, meal.id, &new_meal.food_item_ids)?;
        insert_category_links(conn, meal.id, &new_meal.category_ids)?;

        Ok(details_for(conn, vec![meal])?
            .pop()
            .unwrap_or_else(|| unreachable!()))
    })
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: MealId,
    changes: MealChanges,
) -> Result<Option<MealDetails>> {
    if let Some(new_name) = &changes.name {
        if new_name.trim().is_empty() {
            return Err(StoreError::validation("meal name must not be empty"));
        }
    }
    if let Some(new_food_item_ids) = &changes.food_item_ids {
        validate_food_item_ids(new_food_item_ids)?;
    }

    conn.transaction(|conn| {
        let updated: Option<Meal> = {
            use database::schema::meals::dsl::*;
            use diesel::update;

            let scalar = ScalarChanges {
                name: changes.name.as_deref(),
                description: changes.description.as_deref(),
            };
            update(meals.find(edit_id))
                .set((scalar, updated_at.eq(super::now())))
                .returning(Meal::as_returning())
                .get_result(conn)
                .optional()?
        };
        let Some(meal) = updated else {
            return Ok(None);
        };

        if let Some(new_food_item_ids) = &changes.food_item_ids {
            use database::schema::meal_food_items::dsl::*;
            use diesel::delete;

            delete(meal_food_items.filter(meal_id.eq(edit_id))).execute(conn)?;
            insert_food_item_links(conn, edit_id, new_food_item_ids)?;
        }

        if let Some(new_category_ids) = &changes.category_ids {
            use database::schema::meal_categories::dsl::*;
            use diesel::delete;

            delete(meal_categories.filter(meal_id.eq(edit_id))).execute(conn)?;
            insert_category_links(conn, edit_id, new_category_ids)?;
        }

        Ok(details_for(conn, vec![meal])?.pop())
    })
}

pub fn delete(conn: &mut database::Connection, delete_id: MealId) -> Result<bool> {
    use database::schema::meals::dsl::*;
    use diesel::delete;

    Ok(delete(meals.find(delete_id)).execute(conn)? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_connection;
    use crate::repository::food_items;

    fn food_item(conn: &mut database::Connection, name: &str) -> FoodItemId {
        food_items::create(
            conn,
            food_items::NewFoodItem {
                name: name.into(),
                description: None,
            },
        )
        .unwrap()
        .food_item
        .id
    }

    #[test]
    fn create_with_food_items() {
        let mut conn = test_connection();
        let bread = food_item(&mut conn, "Bread");
        let soup = food_item(&mut conn, "Soup");

        let lunch = create(
            &mut conn,
            NewMeal {
                name: "Lunch".into(),
                description: None,
                food_item_ids: vec![bread, soup],
                category_ids: vec![],
            },
        )
        .unwrap();
        assert_eq!(lunch.food_items.len(), 2);

        let fetched = get(&mut conn, lunch.meal.id).unwrap().unwrap();
        assert_eq!(fetched.food_items.len(), 2);
    }

    #[test]
    fn duplicate_food_item_rejected() {
        let mut conn = test_connection();
        let bread = food_item(&mut conn, "Bread");

        let error = create(
            &mut conn,
            NewMeal {
                name: "Lunch".into(),
                description: None,
                food_item_ids: vec![bread, bread],
                category_ids: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(error, StoreError::Validation(_)));
        assert!(all(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn update_replaces_food_items_wholesale() {
        let mut conn = test_connection();
        let bread = food_item(&mut conn, "Bread");
        let soup = food_item(&mut conn, "Soup");

        let lunch = create(
            &mut conn,
            NewMeal {
                name: "Lunch".into(),
                description: None,
                food_item_ids: vec![bread],
                category_ids: vec![],
            },
        )
        .unwrap();

        let swapped = update(
            &mut conn,
            lunch.meal.id,
            MealChanges {
                food_item_ids: Some(vec![soup]),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(swapped.food_items.len(), 1);
        assert_eq!(swapped.food_items[0].name, "Soup");

        let untouched = update(
            &mut conn,
            lunch.meal.id,
            MealChanges {
                description: Some("Midday".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(untouched.food_items.len(), 1);
    }

    #[test]
    fn deleting_meal_removes_links_but_not_food_items() {
        let mut conn = test_connection();
        let bread = food_item(&mut conn, "Bread");

        let lunch = create(
            &mut conn,
            NewMeal {
                name: "Lunch".into(),
                description: None,
                food_item_ids: vec![bread],
                category_ids: vec![],
            },
        )
        .unwrap();

        assert!(delete(&mut conn, lunch.meal.id).unwrap());

        let link_count: i64 = {
            use database::schema::meal_food_items::dsl::*;
            meal_food_items.count().get_result(&mut conn).unwrap()
        };
        assert_eq!(link_count, 0);
        assert!(food_items::get(&mut conn, bread).unwrap().is_some());
    }

    #[test]
    fn deleting_food_item_removes_meal_links() {
        let mut conn = test_connection();
        let bread = food_item(&mut conn, "Bread");

        let lunch = create(
            &mut conn,
            NewMeal {
                name: "Lunch".into(),
                description: None,
                food_item_ids: vec![bread],
                category_ids: vec![],
            },
        )
        .unwrap();

        food_items::delete(&mut conn, bread).unwrap();
        let fetched = get(&mut conn, lunch.meal.id).unwrap().unwrap();
        assert!(fetched.food_items.is_empty());
    }
}
