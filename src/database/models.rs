// Copyright 2023 Remi Bernotavicius

use chrono::NaiveDateTime;
use diesel::associations::Identifiable;
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct UnitTypeId(pub i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::unit_types)]
pub struct UnitType {
    pub id: UnitTypeId,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct CategoryId(pub i32);

/// A node in the category tree. A `parent_id` of `None` means a root
/// category.
#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::categories)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct IngredientId(pub i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct FoodItemId(pub i32);

/// A prepared item. Produced by zero or more recipes, and usable as a
/// component line in other recipes.
#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::food_items)]
pub struct FoodItem {
    pub id: FoodItemId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct RecipeId(pub i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub description: Option<String>,
    pub food_item_id: FoodItemId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct RecipeInstructionId(pub i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::recipe_instructions)]
pub struct RecipeInstruction {
    pub id: RecipeInstructionId,
    pub recipe_id: RecipeId,
    pub step_number: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct RecipeIngredientId(pub i32);

/// One ingredient line of a recipe. Exactly one of `ingredient_id` and
/// `food_item_id` is set; the schema has a CHECK constraint to match.
#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct RecipeIngredient {
    pub id: RecipeIngredientId,
    pub recipe_id: RecipeId,
    pub ingredient_id: Option<IngredientId>,
    pub food_item_id: Option<FoodItemId>,
    pub unit_type_id: UnitTypeId,
    pub quantity: f32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct MealId(pub i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::meals)]
pub struct Meal {
    pub id: MealId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(DieselNewType, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct MealFoodItemId(pub i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::database::schema::meal_food_items)]
pub struct MealFoodItem {
    pub id: MealFoodItemId,
    pub meal_id: MealId,
    pub food_item_id: FoodItemId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(primary_key(recipe_id, category_id))]
#[diesel(table_name = crate::database::schema::recipe_categories)]
pub struct RecipeCategory {
    pub recipe_id: RecipeId,
    pub category_id: CategoryId,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(primary_key(ingredient_id, category_id))]
#[diesel(table_name = crate::database::schema::ingredient_categories)]
pub struct IngredientCategory {
    pub ingredient_id: IngredientId,
    pub category_id: CategoryId,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(primary_key(meal_id, category_id))]
#[diesel(table_name = crate::database::schema::meal_categories)]
pub struct MealCategory {
    pub meal_id: MealId,
    pub category_id: CategoryId,
    pub created_at: NaiveDateTime,
}
