// Copyright 2023 Remi Bernotavicius

//! Stable JSON shapes for store results. The transport serializes these
//! as-is; listings are keyed by entity name, e.g. `{"recipes": [...]}`.

use crate::database::models::{
    Category, CategoryId, FoodItem, FoodItemId, Ingredient, IngredientId, MealId, RecipeId,
    RecipeIngredientId, RecipeInstruction, UnitType, UnitTypeId,
};
use crate::repository::food_items::FoodItemDetails;
use crate::repository::ingredients::IngredientDetails;
use crate::repository::meals::MealDetails;
use crate::repository::recipes::{RecipeDetails, RecipeLine};
use crate::repository::search::SearchResults;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
pub struct UnitTypeJson {
    pub id: UnitTypeId,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&UnitType> for UnitTypeJson {
    fn from(unit: &UnitType) -> Self {
        Self {
            id: unit.id,
            name: unit.name.clone(),
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CategoryJson {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&Category> for CategoryJson {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            parent_id: category.parent_id,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct IngredientJson {
    pub id: IngredientId,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&Ingredient> for IngredientJson {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            description: ingredient.description.clone(),
            notes: ingredient.notes.clone(),
            created_at: ingredient.created_at,
            updated_at: ingredient.updated_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct IngredientDetailsJson {
    #[serde(flatten)]
    pub ingredient: IngredientJson,
    pub categories: Vec<CategoryJson>,
}

impl From<&IngredientDetails> for IngredientDetailsJson {
    fn from(details: &IngredientDetails) -> Self {
        Self {
            ingredient: (&details.ingredient).into(),
            categories: details.categories.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct FoodItemJson {
    pub id: FoodItemId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&FoodItem> for FoodItemJson {
    fn from(item: &FoodItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RecipeSummaryJson {
    pub id: RecipeId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct FoodItemDetailsJson {
    #[serde(flatten)]
    pub food_item: FoodItemJson,
    pub recipes: Vec<RecipeSummaryJson>,
}

impl From<&FoodItemDetails> for FoodItemDetailsJson {
    fn from(details: &FoodItemDetails) -> Self {
        Self {
            food_item: (&details.food_item).into(),
            recipes: details
                .recipes
                .iter()
                .map(|recipe| RecipeSummaryJson {
                    id: recipe.id,
                    name: recipe.name.clone(),
                    description: recipe.description.clone(),
                })
                .collect(),
        }
    }
}

/// An ingredient line, flattened with the name of whichever source it
/// references and the unit it is measured in.
#[derive(Serialize, Debug, Clone)]
pub struct RecipeIngredientJson {
    pub id: RecipeIngredientId,
    pub ingredient_id: Option<IngredientId>,
    pub food_item_id: Option<FoodItemId>,
    pub name: String,
    pub unit_type_id: UnitTypeId,
    pub unit: String,
    pub quantity: f32,
}

impl From<&RecipeLine> for RecipeIngredientJson {
    fn from(line: &RecipeLine) -> Self {
        let name = line
            .ingredient
            .as_ref()
            .map(|i| i.name.clone())
            .or_else(|| line.food_item.as_ref().map(|f| f.name.clone()))
            .unwrap_or_default();
        Self {
            id: line.line.id,
            ingredient_id: line.line.ingredient_id,
            food_item_id: line.line.food_item_id,
            name,
            unit_type_id: line.line.unit_type_id,
            unit: line.unit.name.clone(),
            quantity: line.line.quantity,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct InstructionJson {
    pub step_number: i32,
    pub text: String,
}

impl From<&RecipeInstruction> for InstructionJson {
    fn from(instruction: &RecipeInstruction) -> Self {
        Self {
            step_number: instruction.step_number,
            text: instruction.text.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RecipeJson {
    pub id: RecipeId,
    pub name: String,
    pub description: Option<String>,
    pub food_item_id: FoodItemId,
    pub ingredients: Vec<RecipeIngredientJson>,
    pub instructions: Vec<InstructionJson>,
    pub categories: Vec<CategoryJson>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&RecipeDetails> for RecipeJson {
    fn from(details: &RecipeDetails) -> Self {
        Self {
            id: details.recipe.id,
            name: details.recipe.name.clone(),
            description: details.recipe.description.clone(),
            food_item_id: details.recipe.food_item_id,
            ingredients: details.ingredients.iter().map(Into::into).collect(),
            instructions: details.instructions.iter().map(Into::into).collect(),
            categories: details.categories.iter().map(Into::into).collect(),
            created_at: details.recipe.created_at,
            updated_at: details.recipe.updated_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct MealJson {
    pub id: MealId,
    pub name: String,
    pub description: Option<String>,
    pub food_items: Vec<FoodItemJson>,
    pub categories: Vec<CategoryJson>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&MealDetails> for MealJson {
    fn from(details: &MealDetails) -> Self {
        Self {
            id: details.meal.id,
            name: details.meal.name.clone(),
            description: details.meal.description.clone(),
            food_items: details.food_items.iter().map(Into::into).collect(),
            categories: details.categories.iter().map(Into::into).collect(),
            created_at: details.meal.created_at,
            updated_at: details.meal.updated_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct RecipesListing {
    pub recipes: Vec<RecipeJson>,
}

impl From<&[RecipeDetails]> for RecipesListing {
    fn from(items: &[RecipeDetails]) -> Self {
        Self {
            recipes: items.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct IngredientsListing {
    pub ingredients: Vec<IngredientJson>,
}

impl From<&[Ingredient]> for IngredientsListing {
    fn from(items: &[Ingredient]) -> Self {
        Self {
            ingredients: items.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct FoodItemsListing {
    pub food_items: Vec<FoodItemDetailsJson>,
}

impl From<&[FoodItemDetails]> for FoodItemsListing {
    fn from(items: &[FoodItemDetails]) -> Self {
        Self {
            food_items: items.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct MealsListing {
    pub meals: Vec<MealJson>,
}

impl From<&[MealDetails]> for MealsListing {
    fn from(items: &[MealDetails]) -> Self {
        Self {
            meals: items.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CategoriesListing {
    pub categories: Vec<CategoryJson>,
}

impl From<&[Category]> for CategoriesListing {
    fn from(items: &[Category]) -> Self {
        Self {
            categories: items.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct UnitTypesListing {
    pub unit_types: Vec<UnitTypeJson>,
}

impl From<&[UnitType]> for UnitTypesListing {
    fn from(items: &[UnitType]) -> Self {
        Self {
            unit_types: items.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SearchResultsJson {
    pub recipes: Vec<RecipeJson>,
    pub meals: Vec<MealJson>,
    pub food_items: Vec<FoodItemDetailsJson>,
    pub ingredients: Vec<IngredientJson>,
}

impl From<&SearchResults> for SearchResultsJson {
    fn from(results: &SearchResults) -> Self {
        Self {
            recipes: results.recipes.iter().map(Into::into).collect(),
            meals: results.meals.iter().map(Into::into).collect(),
            food_items: results.food_items.iter().map(Into::into).collect(),
            ingredients: results.ingredients.iter().map(Into::into).collect(),
        }
    }
}
