//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.

use crate::entities::{
    Article, ChatMessage, Comment, Conversation, Like, Order, Product, User, conversation, like,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::Index,
};
use tracing::{debug, info, instrument};

/// Opens a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table_for<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates a unique index over two columns of `entity`'s table.
async fn create_unique_pair_index<E>(
    db: &DatabaseConnection,
    name: &str,
    entity: E,
    first: E::Column,
    second: E::Column,
) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let statement = Index::create()
        .name(name)
        .table(entity)
        .col(first)
        .col(second)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every marketplace table and unique index that does not exist yet.
///
/// A conversation pair is stored with the smaller user ID first, so the pair
/// index makes each unordered pair unique. A user can like an article once.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table_for(db, &schema, User).await?;
    create_table_for(db, &schema, Product).await?;
    create_table_for(db, &schema, Article).await?;
    create_table_for(db, &schema, Comment).await?;
    create_table_for(db, &schema, Like).await?;
    create_table_for(db, &schema, Order).await?;
    create_table_for(db, &schema, Conversation).await?;
    create_table_for(db, &schema, ChatMessage).await?;

    create_unique_pair_index(
        db,
        "idx_conversations_pair",
        Conversation,
        conversation::Column::ParticipantA,
        conversation::Column::ParticipantB,
    )
    .await?;
    create_unique_pair_index(
        db,
        "idx_likes_article_user",
        Like,
        like::Column::ArticleId,
        like::Column::UserId,
    )
    .await?;

    info!("Database tables ensured");
    Ok(())
}
