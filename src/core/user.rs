//! User business logic - accounts, authentication, and admin moderation.
//!
//! Passwords are stored as bcrypt hashes. Emails are unique ignoring case: every
//! account also stores a lowercased `email_key`, which carries the unique constraint
//! and is the only column lookups compare against.
//! Deleting a user removes the products, comments and likes that reference it;
//! orders and conversations are kept.

use crate::{
    entities::{
        Comment, FarmerPlan, Like, Product, User, UserRole, comment, like, new_id, product, user,
    },
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// bcrypt work factor. Tests use the minimum so hashing stays fast.
const HASH_COST: u32 = if cfg!(test) { 4 } else { bcrypt::DEFAULT_COST };

/// Fields accepted when registering a new account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Display name, must not be blank
    pub name: String,
    /// Login email, unique ignoring case
    pub email: String,
    /// Plain-text password, hashed before storing
    pub password: String,
    /// Account role; new farmers start on the FREE plan
    pub role: UserRole,
    /// Street address
    #[serde(default)]
    pub address: String,
    /// City or regency
    #[serde(default)]
    pub city: String,
    /// Province
    #[serde(default)]
    pub province: String,
}

/// Partial update of a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// New display name
    pub name: Option<String>,
    /// New login email
    pub email: Option<String>,
    /// New role
    pub role: Option<UserRole>,
    /// New plan, ignored for non-farmers
    pub plan: Option<FarmerPlan>,
    /// New street address
    pub address: Option<String>,
    /// New city
    pub city: Option<String>,
    /// New province
    pub province: Option<String>,
}

/// Counts shown on the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// All accounts, admins included
    pub total_users: u64,
    /// Accounts with the farmer role
    pub farmers: u64,
    /// Accounts with the buyer role
    pub buyers: u64,
    /// Products currently listed
    pub total_products: u64,
}

/// Hashes a password with a fresh random salt.
///
/// # Errors
/// Returns [`Error::PasswordHash`] if bcrypt fails.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, HASH_COST).map_err(Into::into)
}

/// Checks a password against a hash produced by [`hash_password`].
/// A malformed stored hash never matches.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

/// The normalized form of an email used for uniqueness and lookups.
#[must_use]
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Maps a unique-constraint violation on the users table to [`Error::EmailTaken`].
fn email_conflict(err: DbErr, email: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::EmailTaken {
            email: email.to_string(),
        },
        _ => err.into(),
    }
}

async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::EmailKey.eq(email_key(email)))
        .one(db)
        .await
        .map_err(Into::into)
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::validation(format!("Invalid email address '{email}'")));
    }
    Ok(())
}

/// Retrieves every user, oldest account first.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::JoinDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a user by ID.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: &str) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Retrieves a user by ID, failing with [`Error::UserNotFound`] if missing.
pub async fn require_user(db: &DatabaseConnection, user_id: &str) -> Result<user::Model> {
    get_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })
}

/// Checks login credentials.
///
/// The email comparison ignores case. Returns `None` both for an unknown email
/// and for a wrong password, so callers cannot tell the two apart.
#[instrument(skip(db, password))]
pub async fn authenticate_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    let Some(found) = find_by_email(db, email).await? else {
        debug!("No account for email");
        return Ok(None);
    };

    if verify_password(password, &found.password_hash) {
        Ok(Some(found))
    } else {
        debug!("Password mismatch");
        Ok(None)
    }
}

/// Registers a new account.
///
/// Farmers start on the FREE plan; other roles have no plan.
///
/// # Errors
/// Returns an error if:
/// - The name or password is empty, or the email is malformed
/// - Another account already uses the email (ignoring case)
/// - The database insert fails
#[instrument(skip(db, new_user), fields(email = %new_user.email))]
pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    if new_user.name.trim().is_empty() {
        return Err(Error::validation("Name cannot be empty"));
    }
    validate_email(&new_user.email)?;
    if new_user.password.is_empty() {
        return Err(Error::validation("Password cannot be empty"));
    }

    if find_by_email(db, &new_user.email).await?.is_some() {
        return Err(Error::EmailTaken {
            email: new_user.email,
        });
    }

    let plan = (new_user.role == UserRole::Farmer).then_some(FarmerPlan::Free);
    let email = new_user.email.trim().to_string();
    let model = user::ActiveModel {
        id: Set(new_id()),
        name: Set(new_user.name.trim().to_string()),
        email_key: Set(email_key(&email)),
        email: Set(email.clone()),
        password_hash: Set(hash_password(&new_user.password)?),
        role: Set(new_user.role),
        plan: Set(plan),
        address: Set(new_user.address),
        city: Set(new_user.city),
        province: Set(new_user.province),
        join_date: Set(chrono::Utc::now()),
    };

    let created = model
        .insert(db)
        .await
        .map_err(|e| email_conflict(e, &email))?;
    info!(user_id = %created.id, role = ?created.role, "User created");
    Ok(created)
}

/// Applies a partial update to a user.
///
/// Switching a user to the farmer role gives them the FREE plan if they had none;
/// switching away from farmer clears the plan.
///
/// # Errors
/// Returns an error if:
/// - The user does not exist
/// - A provided name is empty or email is malformed
/// - The new email belongs to another account
#[instrument(skip(db, update))]
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: &str,
    update: UserUpdate,
) -> Result<user::Model> {
    let existing = require_user(db, user_id).await?;

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(Error::validation("Name cannot be empty"));
        }
    }
    if let Some(email) = &update.email {
        validate_email(email)?;
        if let Some(other) = find_by_email(db, email).await? {
            if other.id != existing.id {
                return Err(Error::EmailTaken {
                    email: email.clone(),
                });
            }
        }
    }

    let role = update.role.unwrap_or(existing.role);
    let plan = if role == UserRole::Farmer {
        Some(update.plan.or(existing.plan).unwrap_or(FarmerPlan::Free))
    } else {
        None
    };

    let mut active: user::ActiveModel = existing.into();
    if let Some(name) = update.name {
        active.name = Set(name.trim().to_string());
    }
    let new_email = update.email.map(|email| email.trim().to_string());
    if let Some(email) = &new_email {
        active.email_key = Set(email_key(email));
        active.email = Set(email.clone());
    }
    if let Some(address) = update.address {
        active.address = Set(address);
    }
    if let Some(city) = update.city {
        active.city = Set(city);
    }
    if let Some(province) = update.province {
        active.province = Set(province);
    }
    active.role = Set(role);
    active.plan = Set(plan);

    active
        .update(db)
        .await
        .map_err(|e| email_conflict(e, new_email.as_deref().unwrap_or_default()))
}

/// Deletes a user together with their products, comments and likes.
///
/// Orders and conversations referencing the user are left in place.
/// Deleting an unknown user is a no-op.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: &str) -> Result<()> {
    let txn = db.begin().await?;

    let products = Product::delete_many()
        .filter(product::Column::FarmerId.eq(user_id))
        .exec(&txn)
        .await?;
    let comments = Comment::delete_many()
        .filter(comment::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let likes = Like::delete_many()
        .filter(like::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    User::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        products = products.rows_affected,
        comments = comments.rows_affected,
        likes = likes.rows_affected,
        "User deleted with related records"
    );
    Ok(())
}

/// Counts users by role and products for the admin dashboard.
pub async fn dashboard_stats(db: &DatabaseConnection) -> Result<DashboardStats> {
    let total_users = User::find().count(db).await?;
    let farmers = User::find()
        .filter(user::Column::Role.eq(UserRole::Farmer))
        .count(db)
        .await?;
    let buyers = User::find()
        .filter(user::Column::Role.eq(UserRole::Buyer))
        .count(db)
        .await?;
    let total_products = Product::find().count(db).await?;

    Ok(DashboardStats {
        total_users,
        farmers,
        buyers,
        total_products,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{article, chat, order};
    use crate::entities::Order;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_password_hash_roundtrip() -> Result<()> {
        let stored = hash_password("rahasia")?;
        assert!(stored.starts_with("$2"));
        assert!(verify_password("rahasia", &stored));
        assert!(!verify_password("Rahasia", &stored));
        assert!(!verify_password("rahasia", "not-a-bcrypt-hash"));
        Ok(())
    }

    #[test]
    fn test_password_hash_is_salted() -> Result<()> {
        assert_ne!(hash_password("same")?, hash_password("same")?);
        Ok(())
    }

    #[test]
    fn test_email_key_folds_unicode_case() {
        assert_eq!(email_key("  Élodie@Example.COM "), "élodie@example.com");
    }

    #[tokio::test]
    async fn test_create_user_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = new_user_input("Budi", "budi@example.com", UserRole::Farmer);
        input.name = "  ".to_string();
        let result = create_user(&db, input).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        let input = new_user_input("Budi", "not-an-email", UserRole::Farmer);
        let result = create_user(&db, input).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        let mut input = new_user_input("Budi", "budi@example.com", UserRole::Farmer);
        input.password = String::new();
        let result = create_user(&db, input).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_assigns_plan_by_role() -> Result<()> {
        let db = setup_test_db().await?;

        let farmer = create_test_user(&db, "Siti", "siti@example.com", UserRole::Farmer).await?;
        let buyer = create_test_user(&db, "Rina", "rina@example.com", UserRole::Buyer).await?;
        let admin = create_test_user(&db, "Admin", "admin@example.com", UserRole::Admin).await?;

        assert_eq!(farmer.plan, Some(FarmerPlan::Free));
        assert_eq!(buyer.plan, None);
        assert_eq!(admin.plan, None);
        assert_eq!(list_users(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_ignores_case() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;

        let result =
            create_user(&db, new_user_input("Other", "BUDI@Example.com", UserRole::Buyer)).await;
        assert!(matches!(result, Err(Error::EmailTaken { email: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_non_ascii_email_is_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "Élodie", "Élodie@example.com", UserRole::Buyer).await?;
        assert_eq!(user.email, "Élodie@example.com");

        let same = authenticate_user(&db, "Élodie@example.com", TEST_PASSWORD).await?;
        assert_eq!(same.unwrap().id, user.id);
        let folded = authenticate_user(&db, "élodie@EXAMPLE.com", TEST_PASSWORD).await?;
        assert_eq!(folded.unwrap().id, user.id);

        let duplicate =
            create_user(&db, new_user_input("Other", "élodie@example.com", UserRole::Buyer)).await;
        assert!(matches!(duplicate, Err(Error::EmailTaken { email: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_email_key_is_unique_in_schema() -> Result<()> {
        let db = setup_test_db().await?;
        let existing = create_test_user(&db, "Andi", "andi@example.com", UserRole::Buyer).await?;

        let raw = user::ActiveModel {
            id: Set(new_id()),
            name: Set("Copy".to_string()),
            email: Set("ANDI@example.com".to_string()),
            email_key: Set(existing.email_key.clone()),
            password_hash: Set(existing.password_hash.clone()),
            role: Set(UserRole::Buyer),
            plan: Set(None),
            address: Set(String::new()),
            city: Set(String::new()),
            province: Set(String::new()),
            join_date: Set(chrono::Utc::now()),
        }
        .insert(&db)
        .await
        .map_err(|e| email_conflict(e, "ANDI@example.com"));
        assert!(matches!(raw, Err(Error::EmailTaken { email: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_user() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "Andi", "andi@example.com", UserRole::Buyer).await?;

        let ok = authenticate_user(&db, "ANDI@example.com", TEST_PASSWORD).await?;
        assert_eq!(ok.unwrap().id, user.id);

        assert!(authenticate_user(&db, "andi@example.com", "wrong").await?.is_none());
        assert!(authenticate_user(&db, "nobody@example.com", TEST_PASSWORD).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_serialized_user_hides_password() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "Andi", "andi@example.com", UserRole::Buyer).await?;

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "BUYER");
        assert_eq!(json["email"], "andi@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_partial() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "Siti", "siti@example.com", UserRole::Farmer).await?;

        let updated = update_user(
            &db,
            &user.id,
            UserUpdate {
                city: Some("Boyolali".to_string()),
                plan: Some(FarmerPlan::Pro),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.city, "Boyolali");
        assert_eq!(updated.plan, Some(FarmerPlan::Pro));
        assert_eq!(updated.name, "Siti");
        assert_eq!(updated.join_date, user.join_date);
        assert_eq!(updated.password_hash, user.password_hash);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_role_change_adjusts_plan() -> Result<()> {
        let db = setup_test_db().await?;
        let buyer = create_test_user(&db, "Rina", "rina@example.com", UserRole::Buyer).await?;

        let farmer = update_user(
            &db,
            &buyer.id,
            UserUpdate {
                role: Some(UserRole::Farmer),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(farmer.plan, Some(FarmerPlan::Free));

        let back = update_user(
            &db,
            &buyer.id,
            UserUpdate {
                role: Some(UserRole::Buyer),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(back.plan, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_errors() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_user(&db, "A", "a@example.com", UserRole::Buyer).await?;
        create_test_user(&db, "B", "b@example.com", UserRole::Buyer).await?;

        let taken = update_user(
            &db,
            &a.id,
            UserUpdate {
                email: Some("B@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(taken, Err(Error::EmailTaken { email: _ })));

        // Keeping your own email is not a conflict
        let same = update_user(
            &db,
            &a.id,
            UserUpdate {
                email: Some("a@example.com".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(same.email, "a@example.com");

        let missing = update_user(&db, "nope", UserUpdate::default()).await;
        assert!(matches!(missing, Err(Error::UserNotFound { id: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_cascades_but_keeps_orders_and_chats() -> Result<()> {
        let db = setup_test_db().await?;
        let farmer = create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;
        let buyer = create_test_user(&db, "Andi", "andi@example.com", UserRole::Buyer).await?;
        let admin = create_test_user(&db, "Admin", "admin@example.com", UserRole::Admin).await?;

        let product = create_test_product(&db, "Cabai Rawit", &farmer.id).await?;
        let post = create_test_article(&db, "Kompos", &admin.id).await?;
        article::add_comment(&db, &post.id, &farmer.id, "Mantap").await?;
        article::toggle_like(&db, &post.id, &farmer.id).await?;
        order::place_order(&db, &buyer.id, &product.id, 2).await?;
        chat::get_or_create_conversation(&db, &buyer.id, &farmer.id).await?;

        delete_user(&db, &farmer.id).await?;

        assert!(get_user_by_id(&db, &farmer.id).await?.is_none());
        assert!(Product::find_by_id(product.id.as_str()).one(&db).await?.is_none());
        assert!(article::comments_for_article(&db, &post.id).await?.is_empty());
        assert!(article::likes_for_article(&db, &post.id).await?.is_empty());

        assert_eq!(Order::find().count(&db).await?, 1);
        assert_eq!(chat::conversations_for_user(&db, &buyer.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_stats() -> Result<()> {
        let db = setup_test_db().await?;
        let farmer = create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;
        create_test_user(&db, "Siti", "siti@example.com", UserRole::Farmer).await?;
        create_test_user(&db, "Andi", "andi@example.com", UserRole::Buyer).await?;
        create_test_user(&db, "Admin", "admin@example.com", UserRole::Admin).await?;
        create_test_product(&db, "Bayam", &farmer.id).await?;

        let stats = dashboard_stats(&db).await?;
        assert_eq!(
            stats,
            DashboardStats {
                total_users: 4,
                farmers: 2,
                buyers: 1,
                total_products: 1,
            }
        );
        Ok(())
    }
}
