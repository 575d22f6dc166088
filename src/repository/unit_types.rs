// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{UnitType, UnitTypeId};
use crate::error::{Result, StoreError};
use diesel::prelude::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::prelude::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct NewUnitType {
    pub name: String,
}

#[derive(Deserialize, diesel::AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::database::schema::unit_types)]
pub struct UnitTypeChanges {
    pub name: Option<String>,
}

pub fn all(conn: &mut database::Connection) -> Result<Vec<UnitType>> {
    use database::schema::unit_types::dsl::*;

    Ok(unit_types
        .select(UnitType::as_select())
        .order(name.asc())
        .load(conn)?)
}

pub fn get(conn: &mut database::Connection, fetch_id: UnitTypeId) -> Result<Option<UnitType>> {
    use database::schema::unit_types::dsl::*;

    Ok(unit_types
        .find(fetch_id)
        .select(UnitType::as_select())
        .get_result(conn)
        .optional()?)
}

pub fn create(conn: &mut database::Connection, new_unit: NewUnitType) -> Result<UnitType> {
    use database::schema::unit_types::dsl::*;
    use diesel::insert_into;

    if new_unit.name.trim().is_empty() {
        return Err(StoreError::validation("unit type name must not be empty"));
    }

    Ok(insert_into(unit_types)
        .values(name.eq(new_unit.name))
        .returning(UnitType::as_returning())
        .get_result(conn)?)
}

pub fn update(
    conn: &mut database::Connection,
    edit_id: UnitTypeId,
    changes: UnitTypeChanges,
) -> Result<Option<UnitType>> {
    use database::schema::unit_types::dsl::*;
    use diesel::update;

    if let Some(new_name) = &changes.name {
        if new_name.trim().is_empty() {
            return Err(StoreError::validation("unit type name must not be empty"));
        }
    }

    Ok(update(unit_types.find(edit_id))
        .set((&changes, updated_at.eq(super::now())))
        .returning(UnitType::as_returning())
        .get_result(conn)
        .optional()?)
}

/// Refuses to delete a unit that any recipe ingredient line still measures
/// with, leaving the database untouched.
pub fn delete(conn: &mut database::Connection, delete_id: UnitTypeId) -> Result<bool> {
    conn.transaction(|conn| {
        let count: i64 = {
            use database::schema::recipe_ingredients::dsl::*;

            recipe_ingredients
                .filter(unit_type_id.eq(delete_id))
                .count()
                .get_result(conn)?
        };

        if count > 0 {
            return Err(StoreError::UnitTypeInUse { count });
        }

        use database::schema::unit_types::dsl::*;
        use diesel::delete;

        Ok(delete(unit_types.find(delete_id)).execute(conn)? > 0)
    })
}
