//! CRUD operations for [`User`] records.

use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{NewUser, User};

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new user and return the assigned row id.
    ///
    /// A collision on the unique email column surfaces as
    /// [`StoreError::DuplicateEmail`]; the existing row is left untouched.
    pub fn insert_user(&self, user: &NewUser) -> Result<i64> {
        let result = self.conn().execute(
            "INSERT INTO users (full_name, email, password_hash, gender, is_admin, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.full_name,
                user.email,
                user.password_hash,
                user.gender,
                user.is_admin,
                user.image,
            ],
        );

        match result {
            Ok(_) => Ok(self.conn().last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateEmail)
            }
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single user by row id.
    pub fn get_user(&self, id: i64) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, full_name, email, password_hash, gender, is_admin, image
                 FROM users
                 WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .map_err(not_found)
    }

    /// Fetch a single user by email.  Used by the login flow.
    pub fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, full_name, email, password_hash, gender, is_admin, image
                 FROM users
                 WHERE email = ?1",
                params![email],
                row_to_user,
            )
            .map_err(not_found)
    }

    /// List all users in registration order.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, full_name, email, password_hash, gender, is_admin, image
             FROM users
             ORDER BY id",
        )?;

        let rows = stmt.query_map([], row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }
}

fn not_found(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        other => StoreError::Sqlite(other),
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        gender: row.get(4)?,
        is_admin: row.get(5)?,
        image: row.get(6)?,
    })
}
