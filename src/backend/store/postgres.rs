/**
 * PostgreSQL Identity Store
 *
 * Account rows live in `auth_user`; access codes are read from the game
 * server's `card` table. Unique constraints on `auth_user` are the final
 * word on username and Baid uniqueness: violations are translated into
 * `StoreError::Conflict` by constraint name.
 */

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{ConflictKind, IdentityStore, StoreError, Uniqueness};
use crate::shared::{AuthUser, Baid};

pub const USERNAME_CONSTRAINT: &str = "auth_user_username_key";
pub const BAID_CONSTRAINT: &str = "auth_user_baid_key";

/// Row shape of `auth_user`
#[derive(Debug, sqlx::FromRow)]
struct AuthUserRow {
    username: String,
    baid: i64,
    password_hash: String,
}

impl TryFrom<AuthUserRow> for AuthUser {
    type Error = StoreError;

    fn try_from(row: AuthUserRow) -> Result<Self, Self::Error> {
        Ok(AuthUser {
            username: row.username,
            baid: from_db_baid(row.baid)?,
            password_hash: row.password_hash,
        })
    }
}

fn to_db_baid(baid: Baid) -> Result<i64, StoreError> {
    i64::try_from(baid).map_err(|_| StoreError::BaidOutOfRange(baid))
}

fn from_db_baid(value: i64) -> Result<Baid, StoreError> {
    Baid::try_from(value).map_err(|_| StoreError::CorruptBaid(value))
}

/// Map a failed write to a conflict when a known unique constraint fired
fn translate_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(USERNAME_CONSTRAINT) => return StoreError::Conflict(ConflictKind::UsernameTaken),
                Some(BAID_CONSTRAINT) => return StoreError::Conflict(ConflictKind::BaidTaken),
                _ => {}
            }
        }
    }
    StoreError::Database(err)
}

/// Identity store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the pool cannot be created.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the embedded migrations in `migrations/`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn get_baid_from_access_code(&self, access_code: &str) -> Result<Option<Baid>, StoreError> {
        let baid = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT baid
            FROM card
            WHERE access_code = $1
            "#,
        )
        .bind(access_code)
        .fetch_optional(&self.pool)
        .await?;

        baid.map(from_db_baid).transpose()
    }

    async fn is_auth_user_unique(&self, username: &str, baid: Baid) -> Result<Uniqueness, StoreError> {
        let (username_taken, baid_taken) = sqlx::query_as::<_, (bool, bool)>(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM auth_user WHERE username = $1),
                EXISTS(SELECT 1 FROM auth_user WHERE baid = $2)
            "#,
        )
        .bind(username)
        .bind(to_db_baid(baid)?)
        .fetch_one(&self.pool)
        .await?;

        Ok(if username_taken {
            Uniqueness::Taken(ConflictKind::UsernameTaken)
        } else if baid_taken {
            Uniqueness::Taken(ConflictKind::BaidTaken)
        } else {
            Uniqueness::Unique
        })
    }

    async fn insert_auth_user(&self, user: &AuthUser) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO auth_user (username, baid, password_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&user.username)
        .bind(to_db_baid(user.baid)?)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(translate_write_error)?;

        Ok(())
    }

    async fn get_auth_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, StoreError> {
        let row = sqlx::query_as::<_, AuthUserRow>(
            r#"
            SELECT username, baid, password_hash
            FROM auth_user
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AuthUser::try_from).transpose()
    }

    async fn get_username_by_baid(&self, baid: Baid) -> Result<Option<String>, StoreError> {
        let username = sqlx::query_scalar::<_, String>(
            r#"
            SELECT username
            FROM auth_user
            WHERE baid = $1
            "#,
        )
        .bind(to_db_baid(baid)?)
        .fetch_optional(&self.pool)
        .await?;

        Ok(username)
    }

    async fn get_password_hash_by_baid(&self, baid: Baid) -> Result<Option<String>, StoreError> {
        let hash = sqlx::query_scalar::<_, String>(
            r#"
            SELECT password_hash
            FROM auth_user
            WHERE baid = $1
            "#,
        )
        .bind(to_db_baid(baid)?)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn change_username(&self, baid: Baid, new_username: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE auth_user
            SET username = $1
            WHERE baid = $2
            "#,
        )
        .bind(new_username)
        .bind(to_db_baid(baid)?)
        .execute(&self.pool)
        .await
        .map_err(translate_write_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownBaid(baid));
        }
        Ok(())
    }

    async fn change_password(&self, baid: Baid, new_hash: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE auth_user
            SET password_hash = $1
            WHERE baid = $2
            "#,
        )
        .bind(new_hash)
        .bind(to_db_baid(baid)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownBaid(baid));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_baid_conversion_bounds() {
        assert_eq!(to_db_baid(42).unwrap(), 42);
        assert_matches!(to_db_baid(u64::MAX), Err(StoreError::BaidOutOfRange(_)));
        assert_matches!(from_db_baid(-1), Err(StoreError::CorruptBaid(-1)));
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        assert_matches!(
            translate_write_error(sqlx::Error::RowNotFound),
            StoreError::Database(sqlx::Error::RowNotFound)
        );
    }

    /// Connects to `TEST_DATABASE_URL`; the database is migrated and the
    /// account table truncated before use.
    async fn test_store() -> PgIdentityStore {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        let store = PgIdentityStore::connect(&url).await.expect("Failed to connect");
        store.migrate().await.expect("Failed to run migrations");
        sqlx::query("TRUNCATE TABLE auth_user")
            .execute(store.pool())
            .await
            .expect("Failed to truncate auth_user");
        sqlx::query("INSERT INTO card (access_code, baid) VALUES ('PG-AC-001', 4242) ON CONFLICT DO NOTHING")
            .execute(store.pool())
            .await
            .expect("Failed to seed card");
        store
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL instance at TEST_DATABASE_URL"]
    async fn test_unique_constraints_are_translated() {
        let store = test_store().await;
        assert_eq!(store.get_baid_from_access_code("PG-AC-001").await.unwrap(), Some(4242));

        store
            .insert_auth_user(&AuthUser::new("drummer", 4242, "hash"))
            .await
            .unwrap();

        assert_matches!(
            store.insert_auth_user(&AuthUser::new("drummer", 4343, "hash")).await,
            Err(StoreError::Conflict(ConflictKind::UsernameTaken))
        );
        assert_matches!(
            store.insert_auth_user(&AuthUser::new("other", 4242, "hash")).await,
            Err(StoreError::Conflict(ConflictKind::BaidTaken))
        );
        assert_eq!(
            store.is_auth_user_unique("drummer", 1).await.unwrap(),
            Uniqueness::Taken(ConflictKind::UsernameTaken)
        );
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL instance at TEST_DATABASE_URL"]
    async fn test_updates() {
        let store = test_store().await;
        store
            .insert_auth_user(&AuthUser::new("drummer", 4242, "hash"))
            .await
            .unwrap();

        store.change_username(4242, "taiko").await.unwrap();
        assert_eq!(store.get_username_by_baid(4242).await.unwrap().as_deref(), Some("taiko"));

        store.change_password(4242, "new-hash").await.unwrap();
        let user = store.get_auth_user_by_username("taiko").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "new-hash");

        assert_matches!(store.change_username(1, "x").await, Err(StoreError::UnknownBaid(1)));
    }
}
