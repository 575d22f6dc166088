// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Category, CategoryId};
use crate::error::{Result, StoreError};
use diesel::prelude::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::prelude::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

/// A missing `parent_id` key leaves the parent untouched; an explicit null
/// re-roots the category.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub parent_id: Option<Option<CategoryId>>,
}

#[derive(diesel::AsChangeset)]
#[diesel(table_name = crate::database::schema::categories)]
struct ScalarChanges<'a> {
    name: Option<&'a str>,
    description: Option<&'a str>,
}

pub fn all(conn: &mut database::Connection) -> Result<Vec<Category>> {
    use database::schema::categories::dsl::*;

    Ok(categories
        .select(Category::as_select())
        .order(name.asc())
        .load(conn)?)
}

pub fn get(conn: &mut database::Connection, fetch_id: CategoryId) -> Result<Option<Category>> {
    use database::schema::categories::dsl::*;

    Ok(categories
        .find(fetch_id)
        .select(Category::as_select())
        .get_result(conn)
        .optional()?)
}

pub fn children(conn: &mut database::Connection, of: CategoryId) -> Result<Vec<Category>> {
    use database::schema::categories::dsl::*;

    Ok(categories
        .filter(parent_id.eq(of))
        .select(Category::as_select())
        .order(name.asc())
        .load(conn)?)
}

fn assert_parent_exists(conn: &mut database::Connection, parent: CategoryId) -> Result<()> {
    use database::schema::categories::dsl::*;

    let found: Option<CategoryId> = categories
        .find(parent)
        .select(id)
        .get_result(conn)
        .optional()?;
    if found.is_none() {
        return Err(StoreError::Validation(format!(
            "parent category {} does not exist",
            parent.0
        )));
    }
    Ok(())
}

/// Walks up from `new_parent`; re-parenting `edit_id` under one of its own
/// descendants (or itself) would detach a cycle from the tree.
fn would_create_cycle(
    conn: &mut database::Connection,
    edit_id: CategoryId,
    new_parent: CategoryId,
) -> Result<bool> {
    use database::schema::categories::dsl::*;

    let mut cursor = new_parent;
    loop {
        if cursor == edit_id {
            return Ok(true);
        }
        let next: Option<Option<CategoryId>> = categories
            .find(cursor)
            .select(parent_id)
            .get_result(conn)
            .optional()?;
        match next {
            Some(Some(parent)) => cursor = parent,
            _ => return Ok(false),
        }
    }
}

/// An unresolvable parent reference is rejected outright rather than being
/// coerced to a root category.
pub fn create(conn: &mut database::Connection, new_category: NewCategory) -> Result<Category> {
    if new_category.name.trim().is_empty() {
        return Err(StoreError::validation("category name must not be empty"));
    }

    conn.transaction(|conn| {
        if let Some(parent) = new_category.parent_id {
            assert_parent_exists(conn, parent)?;
        }

        use database::schema::categories::dsl::*;
        use diesel::insert_into;

        Ok(insert_into(categories)
            .values((
                name.eq(new_category.name),
                description.eq(new_category.description),
                parent_id.eq(new_category.parent_id),
            ))
            .returning(Category::as_returning())
            .get_result(conn)?)
    })
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: CategoryId,
    changes: CategoryChanges,
) -> Result<Option<Category>> {
    if let Some(new_name) = &changes.name {
        if new_name.trim().is_empty() {
            return Err(StoreError::validation("category name must not be empty"));
        }
    }

    conn.transaction(|conn| {
        if get(conn, edit_id)?.is_none() {
            return Ok(None);
        }

        if let Some(Some(new_parent)) = changes.parent_id {
            assert_parent_exists(conn, new_parent)?;
            if would_create_cycle(conn, edit_id, new_parent)? {
                return Err(StoreError::Validation(format!(
                    "category {} cannot become a child of its own descendant {}",
                    edit_id.0, new_parent.0
                )));
            }
        }

        use database::schema::categories::dsl::*;
        use diesel::update;

        let scalar = ScalarChanges {
            name: changes.name.as_deref(),
            description: changes.description.as_deref(),
        };
        update(categories.find(edit_id))
            .set((scalar, updated_at.eq(super::now())))
            .execute(conn)?;

        if let Some(new_parent) = changes.parent_id {
            update(categories.find(edit_id))
                .set(parent_id.eq(new_parent))
                .execute(conn)?;
        }

        get(conn, edit_id)
    })
}

/// Children of a deleted category are re-rooted, not removed; the schema's
/// ON DELETE SET NULL does the work.
pub fn delete(conn: &mut database::Connection, delete_id: CategoryId) -> Result<bool> {
    use database::schema::categories::dsl::*;
    use diesel::delete;

    Ok(delete(categories.find(delete_id)).execute(conn)? > 0)
}
