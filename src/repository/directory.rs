//! Repository implementation for the brand/category/prompt directories.
//!
//! The three tables share one shape, so the per-table Diesel code is
//! generated by a macro and the trait impls dispatch on [`DirectoryKind`].

use diesel::prelude::*;

use crate::db::DbConnection;
use crate::domain::directory::{
    DirectoryEntry, DirectoryKind, NewDirectoryEntry, UpdateDirectoryEntry,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, DirectoryReader, DirectoryWriter};

macro_rules! directory_ops {
    ($get:ident, $list:ident, $create:ident, $update:ident, $delete:ident,
     $table:ident, $model:ident, $new_model:ident, $update_model:ident) => {
        fn $get(conn: &mut DbConnection, id: i32) -> RepositoryResult<Option<DirectoryEntry>> {
            use crate::models::directory::$model;
            use crate::schema::$table;

            let entry = $table::table.find(id).first::<$model>(conn).optional()?;
            Ok(entry.map(Into::into))
        }

        fn $list(
            conn: &mut DbConnection,
            user_id: Option<i32>,
        ) -> RepositoryResult<Vec<DirectoryEntry>> {
            use crate::models::directory::$model;
            use crate::schema::$table;

            let mut query = $table::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(user_id) = user_id {
                query = query.filter($table::user_id.eq(user_id));
            }
            let entries = query.order($table::name.asc()).load::<$model>(conn)?;

            Ok(entries.into_iter().map(Into::into).collect())
        }

        fn $create(
            conn: &mut DbConnection,
            new_entry: &NewDirectoryEntry,
        ) -> RepositoryResult<DirectoryEntry> {
            use crate::models::directory::{$model, $new_model};
            use crate::schema::$table;

            let db_new_entry: $new_model = new_entry.into();
            let entry = diesel::insert_into($table::table)
                .values(&db_new_entry)
                .get_result::<$model>(conn)?;

            Ok(entry.into())
        }

        fn $update(
            conn: &mut DbConnection,
            id: i32,
            updates: &UpdateDirectoryEntry,
        ) -> RepositoryResult<DirectoryEntry> {
            use crate::models::directory::{$model, $update_model};
            use crate::schema::$table;

            let db_updates: $update_model = updates.into();
            let entry = diesel::update($table::table.find(id))
                .set(&db_updates)
                .get_result::<$model>(conn)?;

            Ok(entry.into())
        }

        fn $delete(conn: &mut DbConnection, id: i32) -> RepositoryResult<()> {
            use crate::schema::$table;

            diesel::delete($table::table.find(id)).execute(conn)?;
            Ok(())
        }
    };
}

directory_ops!(
    get_brand,
    list_brands,
    create_brand,
    update_brand,
    delete_brand,
    brands,
    Brand,
    NewBrand,
    UpdateBrand
);
directory_ops!(
    get_category,
    list_categories,
    create_category,
    update_category,
    delete_category,
    categories,
    Category,
    NewCategory,
    UpdateCategory
);
directory_ops!(
    get_prompt,
    list_prompts,
    create_prompt,
    update_prompt,
    delete_prompt,
    prompts,
    Prompt,
    NewPrompt,
    UpdatePrompt
);

impl DirectoryReader for DieselRepository {
    fn get_directory_entry(
        &self,
        kind: DirectoryKind,
        id: i32,
    ) -> RepositoryResult<Option<DirectoryEntry>> {
        let mut conn = self.conn()?;
        match kind {
            DirectoryKind::Brand => get_brand(&mut conn, id),
            DirectoryKind::Category => get_category(&mut conn, id),
            DirectoryKind::Prompt => get_prompt(&mut conn, id),
        }
    }

    fn list_directory_entries(
        &self,
        kind: DirectoryKind,
        user_id: Option<i32>,
    ) -> RepositoryResult<Vec<DirectoryEntry>> {
        let mut conn = self.conn()?;
        match kind {
            DirectoryKind::Brand => list_brands(&mut conn, user_id),
            DirectoryKind::Category => list_categories(&mut conn, user_id),
            DirectoryKind::Prompt => list_prompts(&mut conn, user_id),
        }
    }
}

impl DirectoryWriter for DieselRepository {
    fn create_directory_entry(
        &self,
        kind: DirectoryKind,
        new_entry: &NewDirectoryEntry,
    ) -> RepositoryResult<DirectoryEntry> {
        let mut conn = self.conn()?;
        match kind {
            DirectoryKind::Brand => create_brand(&mut conn, new_entry),
            DirectoryKind::Category => create_category(&mut conn, new_entry),
            DirectoryKind::Prompt => create_prompt(&mut conn, new_entry),
        }
    }

    fn update_directory_entry(
        &self,
        kind: DirectoryKind,
        id: i32,
        updates: &UpdateDirectoryEntry,
    ) -> RepositoryResult<DirectoryEntry> {
        let mut conn = self.conn()?;
        match kind {
            DirectoryKind::Brand => update_brand(&mut conn, id, updates),
            DirectoryKind::Category => update_category(&mut conn, id, updates),
            DirectoryKind::Prompt => update_prompt(&mut conn, id, updates),
        }
    }

    fn delete_directory_entry(&self, kind: DirectoryKind, id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match kind {
            DirectoryKind::Brand => delete_brand(&mut conn, id),
            DirectoryKind::Category => delete_category(&mut conn, id),
            DirectoryKind::Prompt => delete_prompt(&mut conn, id),
        }
    }
}
