// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    Category, CategoryId, FoodItem, FoodItemId, Ingredient, IngredientId, Recipe, RecipeId,
    RecipeIngredient, RecipeIngredientId, RecipeInstruction, UnitType, UnitTypeId,
};
use crate::error::{Result, StoreError};
use diesel::prelude::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::prelude::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// One requested ingredient line. Exactly one of `ingredient_id` and
/// `food_item_id` must be given.
#[derive(Deserialize, Debug, Clone)]
pub struct IngredientLine {
    #[serde(default)]
    pub ingredient_id: Option<IngredientId>,
    #[serde(default)]
    pub food_item_id: Option<FoodItemId>,
    pub unit_type_id: UnitTypeId,
    pub quantity: f32,
}

impl IngredientLine {
    fn validate(&self) -> Result<()> {
        match (self.ingredient_id.is_some(), self.food_item_id.is_some()) {
            (true, false) | (false, true) => Ok(()),
            (true, true) => Err(StoreError::validation(
                "an ingredient line cannot reference both an ingredient and a food item",
            )),
            (false, false) => Err(StoreError::validation(
                "an ingredient line must reference an ingredient or a food item",
            )),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct InstructionLine {
    pub step_number: i32,
    pub text: String,
}

/// Partial edit of one stored line. `None` scalars keep their stored value;
/// the source references follow the missing / null / value convention so a
/// line can move between an ingredient and a food item.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LineChanges {
    #[serde(default, deserialize_with = "super::double_option")]
    pub ingredient_id: Option<Option<IngredientId>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub food_item_id: Option<Option<FoodItemId>>,
    pub unit_type_id: Option<UnitTypeId>,
    pub quantity: Option<f32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub food_item_id: FoodItemId,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub instructions: Vec<InstructionLine>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

/// `None` collections are left as they are; `Some(vec![])` clears them.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub food_item_id: Option<FoodItemId>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub instructions: Option<Vec<InstructionLine>>,
    pub category_ids: Option<Vec<CategoryId>>,
}

#[derive(diesel::AsChangeset)]
#[diesel(table_name = crate::database::schema::recipes)]
struct ScalarChanges<'a> {
    name: Option<&'a str>,
    description: Option<&'a str>,
    food_item_id: Option<FoodItemId>,
}

/// A stored ingredient line with its referenced rows loaded.
#[derive(Debug, Clone)]
pub struct RecipeLine {
    pub line: RecipeIngredient,
    pub unit: UnitType,
    pub ingredient: Option<Ingredient>,
    pub food_item: Option<FoodItem>,
}

#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeLine>,
    pub instructions: Vec<RecipeInstruction>,
    pub categories: Vec<Category>,
}

fn validate_lines(lines: &[IngredientLine]) -> Result<()> {
    for line in lines {
        line.validate()?;
    }
    Ok(())
}

fn validate_instructions(instructions: &[InstructionLine]) -> Result<()> {
    let mut seen = HashSet::new();
    for instruction in instructions {
        if !seen.insert(instruction.step_number) {
            return Err(StoreError::Validation(format!(
                "duplicate step number {}",
                instruction.step_number
            )));
        }
    }
    Ok(())
}

pub fn all(conn: &mut database::Connection) -> Result<Vec<RecipeDetails>> {
    use database::schema::recipes::dsl::*;

    let parents = recipes
        .select(Recipe::as_select())
        .order(name.asc())
        .load(conn)?;
    details_for(conn, parents)
}

pub fn get(conn: &mut database::Connection, fetch_id: RecipeId) -> Result<Option<RecipeDetails>> {
    use database::schema::recipes::dsl::*;

    let Some(recipe) = recipes
        .find(fetch_id)
        .select(Recipe::as_select())
        .get_result(conn)
        .optional()?
    else {
        return Ok(None);
    };

    Ok(details_for(conn, vec![recipe])?.pop())
}

/// Assembles nested details for a batch of recipes in three more queries,
/// however many parents were loaded.
pub(crate) fn details_for(
    conn: &mut database::Connection,
    parents: Vec<Recipe>,
) -> Result<Vec<RecipeDetails>> {
    use database::schema::{
        categories, food_items, ingredients, recipe_categories, recipe_ingredients,
        recipe_instructions, unit_types,
    };

    let ids: Vec<RecipeId> = parents.iter().map(|r| r.id).collect();

    let line_rows: Vec<(RecipeIngredient, UnitType, Option<Ingredient>, Option<FoodItem>)> =
        recipe_ingredients::table
            .inner_join(unit_types::table)
            .left_join(ingredients::table)
            .left_join(food_items::table)
            .filter(recipe_ingredients::recipe_id.eq_any(ids.iter().copied()))
            .select((
                RecipeIngredient::as_select(),
                UnitType::as_select(),
                Option::<Ingredient>::as_select(),
                Option::<FoodItem>::as_select(),
            ))
            .order(recipe_ingredients::id.asc())
            .load(conn)?;
    let mut lines_by_recipe: HashMap<RecipeId, Vec<RecipeLine>> = HashMap::new();
    for (line, unit, ingredient, food_item) in line_rows {
        lines_by_recipe
            .entry(line.recipe_id)
            .or_default()
            .push(RecipeLine {
                line,
                unit,
                ingredient,
                food_item,
            });
    }

    // Presentation relies on this ascending step order.
    let instruction_rows: Vec<RecipeInstruction> = recipe_instructions::table
        .filter(recipe_instructions::recipe_id.eq_any(ids.iter().copied()))
        .select(RecipeInstruction::as_select())
        .order(recipe_instructions::step_number.asc())
        .load(conn)?;
    let mut instructions_by_recipe: HashMap<RecipeId, Vec<RecipeInstruction>> = HashMap::new();
    for instruction in instruction_rows {
        instructions_by_recipe
            .entry(instruction.recipe_id)
            .or_default()
            .push(instruction);
    }

    let category_rows: Vec<(RecipeId, Category)> = recipe_categories::table
        .inner_join(categories::table)
        .filter(recipe_categories::recipe_id.eq_any(ids.iter().copied()))
        .select((recipe_categories::recipe_id, Category::as_select()))
        .load(conn)?;
    let mut categories_by_recipe: HashMap<RecipeId, Vec<Category>> = HashMap::new();
    for (of, category) in category_rows {
        categories_by_recipe.entry(of).or_default().push(category);
    }

    Ok(parents
        .into_iter()
        .map(|recipe| RecipeDetails {
            ingredients: lines_by_recipe.remove(&recipe.id).unwrap_or_default(),
            instructions: instructions_by_recipe.remove(&recipe.id).unwrap_or_default(),
            categories: categories_by_recipe.remove(&recipe.id).unwrap_or_default(),
            recipe,
        })
        .collect())
}

fn insert_lines(
    conn: &mut database::Connection,
    of: RecipeId,
    lines: &[IngredientLine],
) -> Result<()> {
    use database::schema::recipe_ingredients::dsl::*;
    use diesel::insert_into;

    for line in lines {
        insert_into(recipe_ingredients)
            .values((
                recipe_id.eq(of),
                ingredient_id.eq(line.ingredient_id),
                food_item_id.eq(line.food_item_id),
                unit_type_id.eq(line.unit_type_id),
                quantity.eq(line.quantity),
            ))
            .execute(conn)?;
    }
    Ok(())
}

fn insert_instructions(
    conn: &mut database::Connection,
    of: RecipeId,
    instructions: &[InstructionLine],
) -> Result<()> {
    use database::schema::recipe_instructions::dsl::*;
    use diesel::insert_into;

    for instruction in instructions {
        insert_into(recipe_instructions)
            .values((
                recipe_id.eq(of),
                step_number.eq(instruction.step_number),
                text.eq(&instruction.text),
            ))
            .execute(conn)?;
    }
    Ok(())
}

fn insert_category_links(
    conn: &mut database::Connection,
    of: RecipeId,
    new_category_ids: &[CategoryId],
) -> Result<()> {
    use database::schema::recipe_categories::dsl::*;
    use diesel::insert_into;

    for new_category_id in new_category_ids.iter().copied() {
        insert_into(recipe_categories)
            .values((recipe_id.eq(of), category_id.eq(new_category_id)))
            .execute(conn)?;
    }
    Ok(())
}

/// Parent row first to obtain its id, then every nested child, all in one
/// transaction. A failed child insert leaves no recipe behind.
pub fn create(conn: &mut database::Connection, new_recipe: NewRecipe) -> Result<RecipeDetails> {
    if new_recipe.name.trim().is_empty() {
        return Err(StoreError::validation("recipe name must not be empty"));
    }
    validate_lines(&new_recipe.ingredients)?;
    validate_instructions(&new_recipe.instructions)?;

    conn.transaction(|conn| {
        let recipe: Recipe = {
            use database::schema::recipes::dsl::*;
            use diesel::insert_into;

            insert_into(recipes)
                .values((
                    name.eq(new_recipe.name),
                    description.eq(new_recipe.description),
                    food_item_id.eq(new_recipe.food_item_id),
                ))
                .returning(Recipe::as_returning())
                .get_result(conn)?
        };

        insert_lines(conn, recipe.id, &new_recipe.ingredients)?;
        insert_instructions(conn, recipe.id, &new_recipe.instructions)?;
        insert_category_links(conn, recipe.id, &new_recipe.category_ids)?;

        Ok(details_for(conn, vec![recipe])?
            .pop()
            .unwrap_or_else(|| unreachable!()))
    })
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: RecipeId,
    changes: RecipeChanges,
) -> Result<Option<RecipeDetails>> {
    if let Some(new_name) = &changes.name {
        if new_name.trim().is_empty() {
            return Err(StoreError::validation("recipe name must not be empty"));
        }
    }
    if let Some(lines) = &changes.ingredients {
        validate_lines(lines)?;
    }
    if let Some(instructions) = &changes.instructions {
        validate_instructions(instructions)?;
    }

    conn.transaction(|conn| {
        let updated: Option<Recipe> = {
            use database::schema::recipes::dsl::*;
            use diesel::update;

            let scalar = ScalarChanges {
                name: changes.name.as_deref(),
                description: changes.description.as_deref(),
                food_item_id: changes.food_item_id,
            };
            update(recipes.find(edit_id))
                .set((scalar, updated_at.eq(super::now())))
                .returning(Recipe::as_returning())
                .get_result(conn)
                .optional()?
        };
        let Some(recipe) = updated else {
            return Ok(None);
        };

        if let Some(lines) = &changes.ingredients {
            use database::schema::recipe_ingredients::dsl::*;
            use diesel::delete;

            delete(recipe_ingredients.filter(recipe_id.eq(edit_id))).execute(conn)?;
            insert_lines(conn, edit_id, lines)?;
        }

        if let Some(instructions) = &changes.instructions {
            use database::schema::recipe_instructions::dsl::*;
            use diesel::delete;

            delete(recipe_instructions.filter(recipe_id.eq(edit_id))).execute(conn)?;
            insert_instructions(conn, edit_id, instructions)?;
        }

        if let Some(new_category_ids) = &changes.category_ids {
            use database::schema::recipe_categories::dsl::*;
            use diesel::delete;

            delete(recipe_categories.filter(recipe_id.eq(edit_id))).execute(conn)?;
            insert_category_links(conn, edit_id, new_category_ids)?;
        }

        Ok(details_for(conn, vec![recipe])?.pop())
    })
}

/// Appends one ingredient line without touching the rest of the recipe.
/// Returns `None` when the recipe does not exist.
pub fn add_line(
    conn: &mut database::Connection,
    of: RecipeId,
    line: IngredientLine,
) -> Result<Option<RecipeLine>> {
    line.validate()?;

    conn.transaction(|conn| {
        if get(conn, of)?.is_none() {
            return Ok(None);
        }

        let inserted: RecipeIngredient = {
            use database::schema::recipe_ingredients::dsl::*;
            use diesel::insert_into;

            insert_into(recipe_ingredients)
                .values((
                    recipe_id.eq(of),
                    ingredient_id.eq(line.ingredient_id),
                    food_item_id.eq(line.food_item_id),
                    unit_type_id.eq(line.unit_type_id),
                    quantity.eq(line.quantity),
                ))
                .returning(RecipeIngredient::as_returning())
                .get_result(conn)?
        };

        let parent: Recipe = {
            use database::schema::recipes::dsl::*;

            recipes
                .find(of)
                .select(Recipe::as_select())
                .get_result(conn)?
        };
        let details = details_for(conn, vec![parent])?;
        Ok(details
            .into_iter()
            .next()
            .and_then(|d| d.ingredients.into_iter().find(|l| l.line.id == inserted.id)))
    })
}

/// Edits one line in place. Fields left as `None` keep their stored value;
/// a changed source reference still has to satisfy the one-source rule.
pub fn update_line(
    conn: &mut database::Connection,
    of: RecipeId,
    line_id: RecipeIngredientId,
    changes: LineChanges,
) -> Result<Option<RecipeLine>> {
    conn.transaction(|conn| {
        let existing: Option<RecipeIngredient> = {
            use database::schema::recipe_ingredients::dsl::*;

            recipe_ingredients
                .filter(recipe_id.eq(of))
                .filter(id.eq(line_id))
                .select(RecipeIngredient::as_select())
                .get_result(conn)
                .optional()?
        };
        let Some(existing) = existing else {
            return Ok(None);
        };

        let merged = IngredientLine {
            ingredient_id: match &changes.ingredient_id {
                Some(new_source) => *new_source,
                None => existing.ingredient_id,
            },
            food_item_id: match &changes.food_item_id {
                Some(new_source) => *new_source,
                None => existing.food_item_id,
            },
            unit_type_id: changes.unit_type_id.unwrap_or(existing.unit_type_id),
            quantity: changes.quantity.unwrap_or(existing.quantity),
        };
        merged.validate()?;

        {
            use database::schema::recipe_ingredients::dsl::*;
            use diesel::update;

            update(recipe_ingredients.find(line_id))
                .set((
                    ingredient_id.eq(merged.ingredient_id),
                    food_item_id.eq(merged.food_item_id),
                    unit_type_id.eq(merged.unit_type_id),
                    quantity.eq(merged.quantity),
                    updated_at.eq(super::now()),
                ))
                .execute(conn)?;
        }

        let parent: Recipe = {
            use database::schema::recipes::dsl::*;

            recipes
                .find(of)
                .select(Recipe::as_select())
                .get_result(conn)?
        };
        let details = details_for(conn, vec![parent])?;
        Ok(details
            .into_iter()
            .next()
            .and_then(|d| d.ingredients.into_iter().find(|l| l.line.id == line_id)))
    })
}

pub fn remove_line(
    conn: &mut database::Connection,
    of: RecipeId,
    line_id: RecipeIngredientId,
) -> Result<bool> {
    use database::schema::recipe_ingredients::dsl::*;
    use diesel::delete;

    Ok(delete(
        recipe_ingredients
            .filter(recipe_id.eq(of))
            .filter(id.eq(line_id)),
    )
    .execute(conn)?
        > 0)
}

/// Instructions, ingredient lines, and category links go with the recipe.
pub fn delete(conn: &mut database::Connection, delete_id: RecipeId) -> Result<bool> {
    use database::schema::recipes::dsl::*;
    use diesel::delete;

    Ok(delete(recipes.find(delete_id)).execute(conn)? > 0)
}

pub fn in_category(
    conn: &mut database::Connection,
    filter_category_id: CategoryId,
) -> Result<Vec<RecipeDetails>> {
    let ids: Vec<RecipeId> = {
        use database::schema::recipe_categories::dsl::*;

        recipe_categories
            .filter(category_id.eq(filter_category_id))
            .select(recipe_id)
            .load(conn)?
    };

    use database::schema::recipes::dsl::*;

    let parents = recipes
        .filter(id.eq_any(ids))
        .select(Recipe::as_select())
        .order(name.asc())
        .load(conn)?;
    details_for(conn, parents)
}

/// Recipes that use the given food item as a component line (not the ones
/// that produce it).
pub fn using_food_item(
    conn: &mut database::Connection,
    component_id: FoodItemId,
) -> Result<Vec<RecipeDetails>> {
    let ids: Vec<RecipeId> = {
        use database::schema::recipe_ingredients::dsl::*;

        recipe_ingredients
            .filter(food_item_id.eq(component_id))
            .select(recipe_id)
            .distinct()
            .load(conn)?
    };

    use database::schema::recipes::dsl::*;

    let parents = recipes
        .filter(id.eq_any(ids))
        .select(Recipe::as_select())
        .order(name.asc())
        .load(conn)?;
    details_for(conn, parents)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::test_connection;
    use crate::repository::{categories, food_items, ingredients, unit_types};

    pub(crate) struct Fixture {
        pub cup: UnitTypeId,
        pub flour: IngredientId,
        pub bread: FoodItemId,
    }

    pub(crate) fn fixture(conn: &mut database::Connection) -> Fixture {
        let cup = unit_types::create(
            conn,
            unit_types::NewUnitType { name: "cup".into() },
        )
        .unwrap();
        let flour = ingredients::create(
            conn,
            ingredients::NewIngredient {
                name: "Flour".into(),
                description: None,
                notes: None,
                category_ids: vec![],
            },
        )
        .unwrap();
        let bread = food_items::create(
            conn,
            food_items::NewFoodItem {
                name: "Bread".into(),
                description: None,
            },
        )
        .unwrap();
        Fixture {
            cup: cup.id,
            flour: flour.ingredient.id,
            bread: bread.food_item.id,
        }
    }

    pub(crate) fn basic_bread(conn: &mut database::Connection, f: &Fixture) -> RecipeDetails {
        create(
            conn,
            NewRecipe {
                name: "Basic Bread".into(),
                description: Some("A simple loaf".into()),
                food_item_id: f.bread,
                ingredients: vec![IngredientLine {
                    ingredient_id: Some(f.flour),
                    food_item_id: None,
                    unit_type_id: f.cup,
                    quantity: 2.5,
                }],
                instructions: vec![
                    InstructionLine {
                        step_number: 2,
                        text: "Bake".into(),
                    },
                    InstructionLine {
                        step_number: 1,
                        text: "Mix".into(),
                    },
                ],
                category_ids: vec![],
            },
        )
        .unwrap()
    }

    #[test]
    fn create_then_fetch_shows_nested_line() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);
        let created = basic_bread(&mut conn, &f);

        let details = get(&mut conn, created.recipe.id).unwrap().unwrap();
        assert_eq!(details.recipe.name, "Basic Bread");
        assert_eq!(details.ingredients.len(), 1);

        let line = &details.ingredients[0];
        assert_eq!(line.ingredient.as_ref().unwrap().name, "Flour");
        assert_eq!(line.unit.name, "cup");
        assert_eq!(line.line.quantity, 2.5);
        assert!(line.food_item.is_none());

        // Instructions come back ordered by step number regardless of
        // insertion order.
        let steps: Vec<i32> = details.instructions.iter().map(|i| i.step_number).collect();
        assert_eq!(steps, vec![1, 2]);
    }

    #[test]
    fn xor_violations_rejected_before_any_write() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);

        for (ingredient_ref, food_item_ref) in [
            (Some(f.flour), Some(f.bread)),
            (None, None),
        ] {
            let error = create(
                &mut conn,
                NewRecipe {
                    name: "Bad".into(),
                    description: None,
                    food_item_id: f.bread,
                    ingredients: vec![IngredientLine {
                        ingredient_id: ingredient_ref,
                        food_item_id: food_item_ref,
                        unit_type_id: f.cup,
                        quantity: 1.0,
                    }],
                    instructions: vec![],
                    category_ids: vec![],
                },
            )
            .unwrap_err();
            assert!(matches!(error, StoreError::Validation(_)));
        }
        assert!(all(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn duplicate_step_numbers_rejected() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);

        let error = create(
            &mut conn,
            NewRecipe {
                name: "Bad".into(),
                description: None,
                food_item_id: f.bread,
                ingredients: vec![],
                instructions: vec![
                    InstructionLine {
                        step_number: 1,
                        text: "Mix".into(),
                    },
                    InstructionLine {
                        step_number: 1,
                        text: "Mix again".into(),
                    },
                ],
                category_ids: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(error, StoreError::Validation(_)));
        assert!(all(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn update_with_empty_list_clears_lines() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);
        let created = basic_bread(&mut conn, &f);

        let details = update(
            &mut conn,
            created.recipe.id,
            RecipeChanges {
                ingredients: Some(vec![]),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert!(details.ingredients.is_empty());
    }

    #[test]
    fn update_without_collections_leaves_them_untouched() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);
        let created = basic_bread(&mut conn, &f);

        let details = update(
            &mut conn,
            created.recipe.id,
            RecipeChanges {
                description: Some("Now with more crust".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(details.ingredients.len(), 1);
        assert_eq!(details.instructions.len(), 2);
        assert_eq!(
            details.recipe.description.as_deref(),
            Some("Now with more crust")
        );
    }

    #[test]
    fn single_line_can_be_added_and_removed() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);
        let created = basic_bread(&mut conn, &f);

        let added = add_line(
            &mut conn,
            created.recipe.id,
            IngredientLine {
                ingredient_id: None,
                food_item_id: Some(f.bread),
                unit_type_id: f.cup,
                quantity: 1.0,
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(added.food_item.as_ref().unwrap().name, "Bread");

        let details = get(&mut conn, created.recipe.id).unwrap().unwrap();
        assert_eq!(details.ingredients.len(), 2);

        assert!(remove_line(&mut conn, created.recipe.id, added.line.id).unwrap());
        assert!(!remove_line(&mut conn, created.recipe.id, added.line.id).unwrap());

        let details = get(&mut conn, created.recipe.id).unwrap().unwrap();
        assert_eq!(details.ingredients.len(), 1);

        // A line for a recipe that does not exist is absent, not an error.
        assert!(add_line(
            &mut conn,
            RecipeId(999),
            IngredientLine {
                ingredient_id: Some(f.flour),
                food_item_id: None,
                unit_type_id: f.cup,
                quantity: 1.0,
            },
        )
        .unwrap()
        .is_none());
    }

    #[test]
    fn delete_cascades_to_owned_rows_only() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);

        let keep = basic_bread(&mut conn, &f);
        let doomed = create(
            &mut conn,
            NewRecipe {
                name: "Other Bread".into(),
                description: None,
                food_item_id: f.bread,
                ingredients: vec![IngredientLine {
                    ingredient_id: Some(f.flour),
                    food_item_id: None,
                    unit_type_id: f.cup,
                    quantity: 1.0,
                }],
                instructions: vec![InstructionLine {
                    step_number: 1,
                    text: "Wing it".into(),
                }],
                category_ids: vec![],
            },
        )
        .unwrap();

        assert!(delete(&mut conn, doomed.recipe.id).unwrap());

        let line_count: i64 = {
            use database::schema::recipe_ingredients::dsl::*;
            recipe_ingredients.count().get_result(&mut conn).unwrap()
        };
        let instruction_count: i64 = {
            use database::schema::recipe_instructions::dsl::*;
            recipe_instructions.count().get_result(&mut conn).unwrap()
        };
        assert_eq!(line_count, 1);
        assert_eq!(instruction_count, 2);

        let survivor = get(&mut conn, keep.recipe.id).unwrap().unwrap();
        assert_eq!(survivor.ingredients.len(), 1);
    }

    #[test]
    fn single_line_can_be_edited_in_place() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);
        let created = basic_bread(&mut conn, &f);
        let line_id = created.ingredients[0].line.id;

        let edited = update_line(
            &mut conn,
            created.recipe.id,
            line_id,
            LineChanges {
                quantity: Some(3.0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(edited.line.quantity, 3.0);
        assert_eq!(edited.ingredient.as_ref().unwrap().name, "Flour");

        // Moving the line to a food item source clears the ingredient side.
        let moved = update_line(
            &mut conn,
            created.recipe.id,
            line_id,
            LineChanges {
                ingredient_id: Some(None),
                food_item_id: Some(Some(f.bread)),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert!(moved.ingredient.is_none());
        assert_eq!(moved.food_item.as_ref().unwrap().name, "Bread");

        // Setting a second source without clearing the first is rejected.
        let error = update_line(
            &mut conn,
            created.recipe.id,
            line_id,
            LineChanges {
                ingredient_id: Some(Some(f.flour)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(error, StoreError::Validation(_)));

        assert!(update_line(
            &mut conn,
            created.recipe.id,
            RecipeIngredientId(999),
            LineChanges::default(),
        )
        .unwrap()
        .is_none());
    }

    #[test]
    fn delete_removes_category_links_but_not_categories() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);

        let baked = categories::create(
            &mut conn,
            categories::NewCategory {
                name: "Baked".into(),
                description: None,
                parent_id: None,
            },
        )
        .unwrap();
        let created = create(
            &mut conn,
            NewRecipe {
                name: "Basic Bread".into(),
                description: None,
                food_item_id: f.bread,
                ingredients: vec![],
                instructions: vec![],
                category_ids: vec![baked.id],
            },
        )
        .unwrap();
        assert_eq!(created.categories.len(), 1);

        assert!(delete(&mut conn, created.recipe.id).unwrap());

        let link_count: i64 = {
            use database::schema::recipe_categories::dsl::*;
            recipe_categories.count().get_result(&mut conn).unwrap()
        };
        assert_eq!(link_count, 0);
        assert!(categories::get(&mut conn, baked.id).unwrap().is_some());
    }

    #[test]
    fn referenced_unit_type_cannot_be_deleted() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);
        basic_bread(&mut conn, &f);

        let error = unit_types::delete(&mut conn, f.cup).unwrap_err();
        assert!(matches!(error, StoreError::UnitTypeInUse { count: 1 }));
        assert!(unit_types::get(&mut conn, f.cup).unwrap().is_some());
    }

    #[test]
    fn unknown_unit_reference_is_a_constraint_violation() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);

        let error = create(
            &mut conn,
            NewRecipe {
                name: "Bad".into(),
                description: None,
                food_item_id: f.bread,
                ingredients: vec![IngredientLine {
                    ingredient_id: Some(f.flour),
                    food_item_id: None,
                    unit_type_id: UnitTypeId(404),
                    quantity: 1.0,
                }],
                instructions: vec![],
                category_ids: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(error, StoreError::Constraint(_)));
        // The parent insert was rolled back with the failed child.
        assert!(all(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn compound_recipes_and_category_listing() {
        let mut conn = test_connection();
        let f = fixture(&mut conn);

        let sandwich_item = food_items::create(
            &mut conn,
            food_items::NewFoodItem {
                name: "Sandwich".into(),
                description: None,
            },
        )
        .unwrap();
        let lunch = categories::create(
            &mut conn,
            categories::NewCategory {
                name: "Lunch".into(),
                description: None,
                parent_id: None,
            },
        )
        .unwrap();

        // A recipe that consumes Bread, the food item, as a component.
        let sandwich = create(
            &mut conn,
            NewRecipe {
                name: "Sandwich".into(),
                description: None,
                food_item_id: sandwich_item.food_item.id,
                ingredients: vec![IngredientLine {
                    ingredient_id: None,
                    food_item_id: Some(f.bread),
                    unit_type_id: f.cup,
                    quantity: 1.0,
                }],
                instructions: vec![],
                category_ids: vec![lunch.id],
            },
        )
        .unwrap();
        assert_eq!(
            sandwich.ingredients[0].food_item.as_ref().unwrap().name,
            "Bread"
        );

        let by_component = using_food_item(&mut conn, f.bread).unwrap();
        assert_eq!(by_component.len(), 1);
        assert_eq!(by_component[0].recipe.name, "Sandwich");

        let by_category = in_category(&mut conn, lunch.id).unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].categories[0].name, "Lunch");
    }
}
