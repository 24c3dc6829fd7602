//! PostgreSQL content store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, NullOrdering, OnConflict, Order};
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use quill_core::domain::{ContentPost, PostStatus};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

use super::entity::post::{self, Entity as PostEntity};

pub struct PostgresPostRepository {
    pub(crate) db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_error(err: DbErr) -> RepoError {
    let message = err.to_string();
    if message.contains("duplicate") || message.contains("unique") {
        RepoError::Constraint(message)
    } else if matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
        RepoError::Connection(message)
    } else {
        RepoError::Query(message)
    }
}

/// Listing query for a derived status.
///
/// The SQL boundaries mirror `derive_status`: draft is `IS NULL`, scheduled
/// is `> now`, published is `<= now`.
pub(crate) fn status_query(status: Option<PostStatus>, now: DateTime<Utc>) -> Select<PostEntity> {
    let now = DateTimeWithTimeZone::from(now);
    let query = match status {
        None => PostEntity::find(),
        Some(PostStatus::Draft) => PostEntity::find().filter(post::Column::PublishedAt.is_null()),
        Some(PostStatus::Scheduled) => PostEntity::find().filter(post::Column::PublishedAt.gt(now)),
        Some(PostStatus::Published) => {
            PostEntity::find().filter(post::Column::PublishedAt.lte(now))
        }
    };
    newest_first(query)
}

fn newest_first(query: Select<PostEntity>) -> Select<PostEntity> {
    query
        .order_by_with_nulls(post::Column::PublishedAt, Order::Desc, NullOrdering::Last)
        .order_by_desc(post::Column::CreatedAt)
}

#[async_trait]
impl BaseRepository<ContentPost, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContentPost>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, post: ContentPost) -> Result<ContentPost, RepoError> {
        let id = post.id;
        let active_model: post::ActiveModel = post.into();

        PostEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::Title,
                        post::Column::Slug,
                        post::Column::Excerpt,
                        post::Column::Body,
                        post::Column::Tags,
                        post::Column::PublishedAt,
                        post::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(query_error)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Query(format!("post {id} missing after upsert")))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ContentPost>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_by_status(
        &self,
        status: Option<PostStatus>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContentPost>, RepoError> {
        tracing::debug!(status = ?status, %now, "Listing posts");

        let result = status_query(status, now)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Vec<ContentPost>, RepoError> {
        let query = PostEntity::find().filter(Expr::cust_with_values(
            "\"tags\" @> $1",
            [serde_json::json!([tag])],
        ));

        let result = newest_first(query)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
