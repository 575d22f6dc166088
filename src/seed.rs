// Copyright 2023 Remi Bernotavicius

//! Populates an empty database with starter units, categories, and pantry
//! ingredients, plus a worked example recipe and meal.

use crate::database;
use crate::error::Result;
use crate::repository::{categories, food_items, ingredients, meals, recipes, unit_types};

const UNITS: &[&str] = &[
    "cup",
    "tablespoon",
    "teaspoon",
    "gram",
    "kilogram",
    "ounce",
    "pound",
    "milliliter",
    "liter",
    "piece",
    "slice",
    "pinch",
];

const CATEGORIES: &[(&str, &str)] = &[
    ("Breakfast", "Morning meals"),
    ("Lunch", "Midday meals"),
    ("Dinner", "Evening meals"),
    ("Dessert", "Sweet treats"),
    ("Italian", "Italian cuisine"),
    ("Vegetarian", "No meat or fish"),
    ("Baked", "Cooked in oven"),
    ("Quick & Easy", "Ready in under 30 minutes"),
];

const INGREDIENTS: &[(&str, &str, &str)] = &[
    ("Salt", "Table salt or sea salt", "Essential seasoning"),
    ("Black Pepper", "Ground black pepper", "Common spice"),
    ("All-Purpose Flour", "White wheat flour", "Basic baking ingredient"),
    ("Sugar", "White granulated sugar", "Sweetener"),
    ("Butter", "Unsalted butter", "Cooking and baking"),
    ("Olive Oil", "Extra virgin olive oil", "Cooking and dressing"),
    ("Milk", "Whole milk", "Dairy product"),
    ("Yeast", "Active dry yeast", "Leavening agent"),
];

pub fn seed(conn: &mut database::Connection) -> Result<()> {
    let mut units = vec![];
    for unit in UNITS {
        units.push(unit_types::create(
            conn,
            unit_types::NewUnitType {
                name: (*unit).into(),
            },
        )?);
    }
    log::info!("seeded {} unit types", units.len());

    let mut seeded_categories = vec![];
    for (name, description) in CATEGORIES {
        seeded_categories.push(categories::create(
            conn,
            categories::NewCategory {
                name: (*name).into(),
                description: Some((*description).into()),
                parent_id: None,
            },
        )?);
    }
    log::info!("seeded {} categories", seeded_categories.len());

    let mut seeded_ingredients = vec![];
    for (name, description, notes) in INGREDIENTS {
        seeded_ingredients.push(ingredients::create(
            conn,
            ingredients::NewIngredient {
                name: (*name).into(),
                description: Some((*description).into()),
                notes: Some((*notes).into()),
                category_ids: vec![],
            },
        )?);
    }
    log::info!("seeded {} ingredients", seeded_ingredients.len());

    let bread = food_items::create(
        conn,
        food_items::NewFoodItem {
            name: "Bread".into(),
            description: Some("A basic loaf".into()),
        },
    )?;

    let cup = units.iter().find(|u| u.name == "cup").map(|u| u.id);
    let teaspoon = units.iter().find(|u| u.name == "teaspoon").map(|u| u.id);
    let flour = seeded_ingredients
        .iter()
        .find(|i| i.ingredient.name == "All-Purpose Flour")
        .map(|i| i.ingredient.id);
    let salt = seeded_ingredients
        .iter()
        .find(|i| i.ingredient.name == "Salt")
        .map(|i| i.ingredient.id);
    let baked = seeded_categories
        .iter()
        .find(|c| c.name == "Baked")
        .map(|c| c.id);

    if let (Some(cup), Some(teaspoon), Some(flour), Some(salt), Some(baked)) =
        (cup, teaspoon, flour, salt, baked)
    {
        let recipe = recipes::create(
            conn,
            recipes::NewRecipe {
                name: "Basic Bread".into(),
                description: Some("A simple white loaf".into()),
                food_item_id: bread.food_item.id,
                ingredients: vec![
                    recipes::IngredientLine {
                        ingredient_id: Some(flour),
                        food_item_id: None,
                        unit_type_id: cup,
                        quantity: 2.5,
                    },
                    recipes::IngredientLine {
                        ingredient_id: Some(salt),
                        food_item_id: None,
                        unit_type_id: teaspoon,
                        quantity: 1.0,
                    },
                ],
                instructions: vec![
                    recipes::InstructionLine {
                        step_number: 1,
                        text: "Mix the dry ingredients".into(),
                    },
                    recipes::InstructionLine {
                        step_number: 2,
                        text: "Knead, prove, and shape".into(),
                    },
                    recipes::InstructionLine {
                        step_number: 3,
                        text: "Bake at 220C for 30 minutes".into(),
                    },
                ],
                category_ids: vec![baked],
            },
        )?;
        log::info!("seeded recipe {:?}", recipe.recipe.name);
    }

    let breakfast = seeded_categories
        .iter()
        .find(|c| c.name == "Breakfast")
        .map(|c| c.id);
    meals::create(
        conn,
        meals::NewMeal {
            name: "Toast Breakfast".into(),
            description: Some("Bread, toasted".into()),
            food_item_ids: vec![bread.food_item.id],
            category_ids: breakfast.into_iter().collect(),
        },
    )?;
    log::info!("seeding complete");

    Ok(())
}
