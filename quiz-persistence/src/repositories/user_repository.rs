use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use quiz_types::{LeaderboardEntry, User};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            username: model.username,
            email: model.email,
            is_admin: model.is_admin,
            total_points: model.total_points,
            weekly_points: model.weekly_points,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user_model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn create_user(&self, user: User) -> Result<User> {
        let now = Utc::now().into();

        let user_model = users::ActiveModel {
            id: sea_orm::ActiveValue::Set(user.id),
            username: sea_orm::ActiveValue::Set(user.username),
            email: sea_orm::ActiveValue::Set(user.email),
            is_admin: sea_orm::ActiveValue::Set(user.is_admin),
            total_points: sea_orm::ActiveValue::Set(user.total_points),
            weekly_points: sea_orm::ActiveValue::Set(user.weekly_points),
            created_at: sea_orm::ActiveValue::Set(user.created_at.into()),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        let saved_model = Users::insert(user_model).exec(&self.db).await?;

        // Fetch the created user
        let created_user = Users::find_by_id(saved_model.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        Ok(Self::model_to_user(created_user))
    }

    /// Credit points to a user's running totals.
    pub async fn add_points(&self, user_id: Uuid, points_gained: i32) -> Result<()> {
        let user = Users::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let updated_user = users::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(user.id),
            username: sea_orm::ActiveValue::Unchanged(user.username),
            email: sea_orm::ActiveValue::Unchanged(user.email),
            is_admin: sea_orm::ActiveValue::Unchanged(user.is_admin),
            total_points: sea_orm::ActiveValue::Set(user.total_points + points_gained),
            weekly_points: sea_orm::ActiveValue::Set(user.weekly_points + points_gained),
            created_at: sea_orm::ActiveValue::Unchanged(user.created_at),
            updated_at: sea_orm::ActiveValue::Set(Utc::now().into()),
        };

        Users::update(updated_user).exec(&self.db).await?;
        Ok(())
    }

    /// Zero every user's weekly points. Applied when a new game week starts.
    pub async fn reset_weekly_points(&self) -> Result<()> {
        Users::update_many()
            .col_expr(users::Column::WeeklyPoints, Expr::value(0))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn get_leaderboard(&self, limit: u64) -> Result<Vec<LeaderboardEntry>> {
        let users = Users::find()
            .order_by_desc(users::Column::TotalPoints)
            .limit(limit)
            .all(&self.db)
            .await?;

        let leaderboard = users
            .into_iter()
            .enumerate()
            .map(|(index, model)| LeaderboardEntry {
                user_id: model.id,
                username: model.username,
                total_points: model.total_points,
                weekly_points: model.weekly_points,
                rank: (index + 1) as u32,
            })
            .collect();

        Ok(leaderboard)
    }

    pub async fn get_user_rank(&self, user_id: Uuid) -> Result<Option<u32>> {
        let user = Users::find_by_id(user_id).one(&self.db).await?;

        if let Some(user_model) = user {
            let users_above = Users::find()
                .filter(users::Column::TotalPoints.gt(user_model.total_points))
                .count(&self.db)
                .await?;

            Ok(Some(users_above as u32 + 1))
        } else {
            Ok(None)
        }
    }
}
