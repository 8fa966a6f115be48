use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;
    const ENTITY_NAME: &'static str = "user";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        let username = username.to_string();
        self.find(1, 1, &[], move |query| {
            query.filter(user::Column::Username.eq(username))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// Exact, case-sensitive match.
    pub async fn email_exists(&self, email: &str) -> DaoResult<bool> {
        let email = email.to_string();
        self.find(1, 1, &[], move |query| {
            query.filter(user::Column::Email.eq(email))
        })
        .await
        .map(|response| !response.data.is_empty())
    }

    pub async fn find_active_by_email(&self, email: &str) -> DaoResult<Vec<user::Model>> {
        let email = email.to_string();
        self.find_all(&[(user::Column::Username, Order::Asc)], move |query| {
            query
                .filter(user::Column::Email.eq(email))
                .filter(user::Column::IsActive.eq(true))
        })
        .await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_active: Set(true),
            last_login_at: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_last_login(
        &self,
        id: &Uuid,
        at: &chrono::DateTime<chrono::FixedOffset>,
    ) -> DaoResult<()> {
        let at = *at;
        self.update(*id, move |active| {
            active.last_login_at = Set(Some(at));
        })
        .await
        .map(|_| ())
    }

    pub async fn set_password_hash(&self, id: &Uuid, password_hash: &str) -> DaoResult<()> {
        let password_hash = password_hash.to_string();
        self.update(*id, move |active| {
            active.password_hash = Set(password_hash);
        })
        .await
        .map(|_| ())
    }
}
