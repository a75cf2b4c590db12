use async_trait::async_trait;
use chrono::NaiveDate;
use fittrack_model::{
    profile::{FitnessProfile, ProfileFields},
    user::{User, Username},
};
use log::debug;
use sqlx::{sqlite::SqliteRow, Connection as SqlxConnection, FromRow, Row, SqliteConnection};

use crate::{connection::Connection, Error, Result};

const SELECT_USERS: &str = "SELECT u.id, u.username, u.name,
    p.gender, p.date_of_birth, p.age, p.contact_number,
    p.height, p.weight, p.bmi, p.joining_date, p.goal
FROM users u
JOIN fitness_profiles p ON p.user_id = u.id";

#[mockall::automock]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn username_exists(&self, username: &Username) -> Result<bool>;
    /// Stores the user and its profile in one transaction. Age and BMI are
    /// derived from `fields` as of `today`.
    async fn create_user(
        &self,
        username: &Username,
        name: &str,
        fields: &ProfileFields,
        today: NaiveDate,
    ) -> Result<User>;
    async fn fetch_user(&self, username: &Username) -> Result<Option<User>>;
    async fn fetch_users(&self) -> Result<Vec<User>>;
    /// Replaces the profile of an existing user, deriving age and BMI anew.
    /// `None` if there is no such user.
    async fn update_profile(
        &self,
        username: &Username,
        fields: &ProfileFields,
        today: NaiveDate,
    ) -> Result<Option<User>>;
    /// Deletes the user together with its profile. `false` if there was no such user.
    async fn delete_user(&self, username: &Username) -> Result<bool>;
}

#[derive(Clone)]
pub struct UserRepositoryImpl {
    connection: Connection,
}

impl UserRepositoryImpl {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: Username::from(row.try_get::<String, _>("username")?),
        name: row.try_get("name")?,
        fitness_profile: FitnessProfile::from_row(row)?,
    })
}

async fn select_user(conn: &mut SqliteConnection, username: &Username) -> Result<Option<User>> {
    let query = format!("{} WHERE u.username = ?", SELECT_USERS);
    sqlx::query(&query)
        .bind(username.as_str())
        .fetch_optional(conn)
        .await?
        .as_ref()
        .map(user_from_row)
        .transpose()
}

fn map_insert_error(error: sqlx::Error, username: &Username) -> Error {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            Error::DuplicateUsername(username.to_string())
        }
        _ => Error::Database(error),
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn username_exists(&self, username: &Username) -> Result<bool> {
        let mut conn = self.connection.lock().await;
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)")
                .bind(username.as_str())
                .fetch_one(&mut *conn)
                .await?;
        Ok(exists != 0)
    }

    async fn create_user(
        &self,
        username: &Username,
        name: &str,
        fields: &ProfileFields,
        today: NaiveDate,
    ) -> Result<User> {
        let profile = FitnessProfile::new(fields.clone(), today);
        let mut conn = self.connection.lock().await;
        let mut tx = conn.begin().await?;

        debug!("Storing user {}", username);
        let id = sqlx::query("INSERT INTO users (username, name) VALUES (?, ?)")
            .bind(username.as_str())
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, username))?
            .last_insert_rowid();

        debug!("Storing fitness profile of user {}", username);
        sqlx::query(
            "INSERT INTO fitness_profiles
                (user_id, gender, date_of_birth, age, contact_number,
                 height, weight, bmi, joining_date, goal)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(profile.gender().code())
        .bind(profile.date_of_birth())
        .bind(profile.age())
        .bind(profile.contact_number().as_str())
        .bind(profile.height_cm())
        .bind(profile.weight_kg())
        .bind(profile.bmi())
        .bind(profile.joining_date())
        .bind(profile.goal().code())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(User {
            id,
            username: username.clone(),
            name: name.to_owned(),
            fitness_profile: profile,
        })
    }

    async fn fetch_user(&self, username: &Username) -> Result<Option<User>> {
        let mut conn = self.connection.lock().await;
        select_user(&mut conn, username).await
    }

    async fn fetch_users(&self) -> Result<Vec<User>> {
        let query = format!("{} ORDER BY u.id", SELECT_USERS);
        let mut conn = self.connection.lock().await;
        let rows = sqlx::query(&query).fetch_all(&mut *conn).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn update_profile(
        &self,
        username: &Username,
        fields: &ProfileFields,
        today: NaiveDate,
    ) -> Result<Option<User>> {
        let profile = FitnessProfile::new(fields.clone(), today);
        let mut conn = self.connection.lock().await;

        debug!("Updating fitness profile of user {}", username);
        let updated = sqlx::query(
            "UPDATE fitness_profiles
            SET gender = ?, date_of_birth = ?, age = ?, contact_number = ?,
                height = ?, weight = ?, bmi = ?, joining_date = ?, goal = ?
            WHERE user_id = (SELECT id FROM users WHERE username = ?)",
        )
        .bind(profile.gender().code())
        .bind(profile.date_of_birth())
        .bind(profile.age())
        .bind(profile.contact_number().as_str())
        .bind(profile.height_cm())
        .bind(profile.weight_kg())
        .bind(profile.bmi())
        .bind(profile.joining_date())
        .bind(profile.goal().code())
        .bind(username.as_str())
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }
        select_user(&mut conn, username).await
    }

    async fn delete_user(&self, username: &Username) -> Result<bool> {
        let mut conn = self.connection.lock().await;

        debug!("Deleting user {}", username);
        let deleted = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username.as_str())
            .execute(&mut *conn)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
