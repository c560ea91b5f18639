//! Diesel models for the brand/category/prompt dictionaries.
//!
//! The three tables share one shape, so the model triple for each is
//! generated by a macro instead of being written out three times.

use diesel::prelude::*;

use crate::domain::directory::{
    DirectoryEntry, NewDirectoryEntry as DomainNewEntry, UpdateDirectoryEntry as DomainUpdateEntry,
};

macro_rules! directory_models {
    ($table:ident, $model:ident, $new:ident, $update:ident) => {
        #[derive(Debug, Clone, Identifiable, Queryable)]
        #[diesel(table_name = crate::schema::$table)]
        pub struct $model {
            pub id: i32,
            pub user_id: i32,
            pub name: String,
            pub description: Option<String>,
        }

        #[derive(Insertable)]
        #[diesel(table_name = crate::schema::$table)]
        pub struct $new<'a> {
            pub user_id: i32,
            pub name: &'a str,
            pub description: Option<&'a str>,
        }

        #[derive(AsChangeset)]
        #[diesel(table_name = crate::schema::$table)]
        #[diesel(treat_none_as_null = true)]
        pub struct $update<'a> {
            pub name: &'a str,
            pub description: Option<&'a str>,
        }

        impl From<$model> for DirectoryEntry {
            fn from(entry: $model) -> Self {
                Self {
                    id: entry.id,
                    user_id: entry.user_id,
                    name: entry.name,
                    description: entry.description,
                }
            }
        }

        impl<'a> From<&'a DomainNewEntry> for $new<'a> {
            fn from(entry: &'a DomainNewEntry) -> Self {
                Self {
                    user_id: entry.user_id,
                    name: entry.name.as_str(),
                    description: entry.description.as_deref(),
                }
            }
        }

        impl<'a> From<&'a DomainUpdateEntry> for $update<'a> {
            fn from(entry: &'a DomainUpdateEntry) -> Self {
                Self {
                    name: entry.name.as_str(),
                    description: entry.description.as_deref(),
                }
            }
        }
    };
}

directory_models!(brands, Brand, NewBrand, UpdateBrand);
directory_models!(categories, Category, NewCategory, UpdateCategory);
directory_models!(prompts, Prompt, NewPrompt, UpdatePrompt);
