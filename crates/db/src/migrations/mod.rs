//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_admin_table;
mod m20250601_000002_create_image_table;
mod m20250601_000003_create_news_table;
mod m20250601_000004_create_event_table;
mod m20250601_000005_create_tag_tables;
mod m20250601_000006_create_resource_tables;
mod m20250601_000007_create_course_tables;
mod m20250601_000008_create_topic_tables;
mod m20250601_000009_create_review_table;
mod m20250601_000010_create_visitor_and_admission_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_admin_table::Migration),
            Box::new(m20250601_000002_create_image_table::Migration),
            Box::new(m20250601_000003_create_news_table::Migration),
            Box::new(m20250601_000004_create_event_table::Migration),
            Box::new(m20250601_000005_create_tag_tables::Migration),
            Box::new(m20250601_000006_create_resource_tables::Migration),
            Box::new(m20250601_000007_create_course_tables::Migration),
            Box::new(m20250601_000008_create_topic_tables::Migration),
            Box::new(m20250601_000009_create_review_table::Migration),
            Box::new(m20250601_000010_create_visitor_and_admission_tables::Migration),
        ]
    }
}
