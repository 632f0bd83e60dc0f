use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::menu::{MenuItem, MenuItemDraft};
use crate::domain::ports::MenuRepository;
use crate::schema::menu_items;

use super::models::{MenuItemChangeset, MenuItemRow, NewMenuItemRow};

pub struct DieselMenuRepository {
    pool: DbPool,
}

impl DieselMenuRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl MenuRepository for DieselMenuRepository {
    fn list(&self) -> Result<Vec<MenuItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = menu_items::table
            .order(menu_items::name.asc())
            .select(MenuItemRow::as_select())
            .load::<MenuItemRow>(&mut conn)?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    fn get(&self, id: i32) -> Result<Option<MenuItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = menu_items::table
            .find(id)
            .select(MenuItemRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(MenuItem::from))
    }

    fn create(&self, draft: MenuItemDraft) -> Result<MenuItem, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(menu_items::table)
            .values(&NewMenuItemRow {
                name: draft.name,
                description: draft.description,
                price: draft.price,
                category: draft.category,
                image: draft.image,
                available: draft.available,
            })
            .returning(MenuItemRow::as_returning())
            .get_result(&mut conn)?;

        Ok(MenuItem::from(row))
    }

    fn update(&self, id: i32, draft: MenuItemDraft) -> Result<Option<MenuItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(menu_items::table.find(id))
            .set(&MenuItemChangeset {
                name: draft.name,
                description: draft.description,
                price: draft.price,
                category: draft.category,
                image: draft.image,
                available: draft.available,
                updated_at: Utc::now(),
            })
            .returning(MenuItemRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(row.map(MenuItem::from))
    }

    fn delete(&self, id: i32) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(menu_items::table.find(id)).execute(&mut conn)?;
        Ok(affected)
    }
}
