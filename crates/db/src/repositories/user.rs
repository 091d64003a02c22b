//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use amanat_core::auth::Role;
use amanat_shared::types::{PageRequest, PageResponse};

use super::letter::{contains_ci, search_term};
use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login email (stored lowercase).
    pub email: String,
    /// Argon2id PHC hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Organizational role.
    pub role: Role,
}

/// Input for updating a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New display name.
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// Activate or deactivate the account.
    pub is_active: Option<bool>,
}

/// Filter for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Only users with this role.
    pub role: Option<Role>,
    /// Only active (or inactive) users.
    pub is_active: Option<bool>,
    /// Case-insensitive match on name or email.
    pub search: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new active user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (including a duplicate email).
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email.trim().to_lowercase()),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name.trim().to_string()),
            role: Set(input.role.into()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Updates a user. Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name.trim().to_string());
        }
        if let Some(role) = input.role {
            active.role = Set(role.into());
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Lists users, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<users::Model>, DbErr> {
        let mut query = users::Entity::find();
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(UserRole::from(role)));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(users::Column::IsActive.eq(is_active));
        }
        if let Some(search) = search_term(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(users::Column::FullName, search))
                    .add(contains_ci(users::Column::Email, search)),
            );
        }

        let paginator = query
            .order_by_asc(users::Column::FullName)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Lists active users that `exclude` may route a letter to.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_recipients(&self, exclude: Uuid) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::IsActive.eq(true))
            .filter(users::Column::Id.ne(exclude))
            .order_by_asc(users::Column::Role)
            .order_by_asc(users::Column::FullName)
            .all(&self.db)
            .await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
