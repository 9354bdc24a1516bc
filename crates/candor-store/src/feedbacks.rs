//! CRUD operations for [`Feedback`] records.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::models::{Feedback, FeedbackWithOwner, NewFeedback, User};

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new feedback row and return the stored record.
    ///
    /// The submission timestamp is stamped here from the server clock; it
    /// is never accepted from the caller.
    pub fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback> {
        let submitted_at = Utc::now();

        self.conn().execute(
            "INSERT INTO feedbacks (heading, category, subcategory, message, submitted_at, user_id, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                feedback.heading,
                feedback.category,
                feedback.subcategory,
                feedback.message,
                submitted_at.to_rfc3339(),
                feedback.user_id,
                feedback.image,
            ],
        )?;

        Ok(Feedback {
            id: self.conn().last_insert_rowid(),
            heading: feedback.heading.clone(),
            category: feedback.category.clone(),
            subcategory: feedback.subcategory.clone(),
            message: feedback.message.clone(),
            submitted_at,
            user_id: feedback.user_id,
            image: feedback.image.clone(),
        })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// All feedback owned by one user, newest submission first.
    pub fn feedbacks_for_user(&self, user_id: i64) -> Result<Vec<Feedback>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, heading, category, subcategory, message, submitted_at, user_id, image
             FROM feedbacks
             WHERE user_id = ?1
             ORDER BY submitted_at DESC",
        )?;

        let rows = stmt.query_map(params![user_id], row_to_feedback)?;

        let mut feedbacks = Vec::new();
        for row in rows {
            feedbacks.push(row?);
        }
        Ok(feedbacks)
    }

    /// All feedback joined with the owning user's display fields, newest
    /// first.  Backs the administrative feed.
    pub fn all_feedbacks_with_owner(&self) -> Result<Vec<FeedbackWithOwner>> {
        let mut stmt = self.conn().prepare(
            "SELECT f.id, f.heading, f.category, f.subcategory, f.message,
                    f.submitted_at, f.user_id, f.image,
                    u.full_name, u.email
             FROM feedbacks f
             JOIN users u ON u.id = f.user_id
             ORDER BY f.submitted_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(FeedbackWithOwner {
                feedback: row_to_feedback(row)?,
                full_name: row.get(8)?,
                email: row.get(9)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Every user paired with their feedback list (newest first), produced
    /// by a single joined query rather than one query per user.
    pub fn users_with_feedbacks(&self) -> Result<Vec<(User, Vec<Feedback>)>> {
        let users = self.list_users()?;

        let mut stmt = self.conn().prepare(
            "SELECT id, heading, category, subcategory, message, submitted_at, user_id, image
             FROM feedbacks
             ORDER BY user_id, submitted_at DESC",
        )?;
        let rows = stmt.query_map([], row_to_feedback)?;

        let mut by_owner: std::collections::HashMap<i64, Vec<Feedback>> =
            std::collections::HashMap::new();
        for row in rows {
            let feedback = row?;
            by_owner.entry(feedback.user_id).or_default().push(feedback);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let feedbacks = by_owner.remove(&user.id).unwrap_or_default();
                (user, feedbacks)
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Remove one feedback row.  Returns `false` if no such row existed.
    pub fn delete_feedback(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM feedbacks WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

fn row_to_feedback(row: &rusqlite::Row<'_>) -> rusqlite::Result<Feedback> {
    let ts_str: String = row.get(5)?;
    let submitted_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Feedback {
        id: row.get(0)?,
        heading: row.get(1)?,
        category: row.get(2)?,
        subcategory: row.get(3)?,
        message: row.get(4)?,
        submitted_at,
        user_id: row.get(6)?,
        image: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;

    fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (db, dir)
    }

    fn register(db: &Database, email: &str, name: &str) -> i64 {
        db.insert_user(&NewUser {
            full_name: name.into(),
            email: email.into(),
            password_hash: "$argon2id$stub".into(),
            gender: String::new(),
            is_admin: false,
            image: None,
        })
        .unwrap()
    }

    fn submit(db: &Database, user_id: i64, heading: &str) -> Feedback {
        db.insert_feedback(&NewFeedback {
            heading: heading.into(),
            category: "Services".into(),
            subcategory: "Transportation".into(),
            message: format!("message for {heading}"),
            user_id,
            image: None,
        })
        .unwrap()
    }

    #[test]
    fn insert_stamps_server_time_and_owner() {
        let (db, _dir) = test_db();
        let user_id = register(&db, "ana@example.com", "Ana");

        let before = Utc::now();
        let stored = submit(&db, user_id, "Shuttle timing");
        let after = Utc::now();

        assert_eq!(stored.user_id, user_id);
        assert!(stored.submitted_at >= before && stored.submitted_at <= after);

        let listed = db.feedbacks_for_user(user_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], stored);
    }

    #[test]
    fn personal_feed_is_isolated_and_newest_first() {
        let (db, _dir) = test_db();
        let ana = register(&db, "ana@example.com", "Ana");
        let bo = register(&db, "bo@example.com", "Bo");

        let first = submit(&db, ana, "first");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = submit(&db, ana, "second");
        submit(&db, bo, "bo-only");

        let feed = db.feedbacks_for_user(ana).unwrap();
        assert_eq!(
            feed.iter().map(|f| f.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert!(feed.iter().all(|f| f.user_id == ana));
    }

    #[test]
    fn admin_feed_joins_owner_fields() {
        let (db, _dir) = test_db();
        let ana = register(&db, "ana@example.com", "Ana Ruiz");
        submit(&db, ana, "Parking");

        let all = db.all_feedbacks_with_owner().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].full_name, "Ana Ruiz");
        assert_eq!(all[0].email, "ana@example.com");
        assert_eq!(all[0].feedback.heading, "Parking");
    }

    #[test]
    fn delete_removes_exactly_one_row() {
        let (db, _dir) = test_db();
        let ana = register(&db, "ana@example.com", "Ana");
        let keep = submit(&db, ana, "keep");
        let gone = submit(&db, ana, "gone");

        assert!(db.delete_feedback(gone.id).unwrap());
        // Second delete and unknown ids report not-found.
        assert!(!db.delete_feedback(gone.id).unwrap());
        assert!(!db.delete_feedback(9999).unwrap());

        let remaining = db.feedbacks_for_user(ana).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[test]
    fn users_with_feedbacks_covers_feedbackless_users() {
        let (db, _dir) = test_db();
        let ana = register(&db, "ana@example.com", "Ana");
        let bo = register(&db, "bo@example.com", "Bo");
        submit(&db, ana, "one");
        std::thread::sleep(std::time::Duration::from_millis(5));
        submit(&db, ana, "two");

        let view = db.users_with_feedbacks().unwrap();
        assert_eq!(view.len(), 2);

        let (ana_user, ana_feed) = view.iter().find(|(u, _)| u.id == ana).unwrap();
        assert_eq!(ana_user.email, "ana@example.com");
        assert_eq!(ana_feed.len(), 2);
        assert!(ana_feed[0].submitted_at >= ana_feed[1].submitted_at);

        let (_, bo_feed) = view.iter().find(|(u, _)| u.id == bo).unwrap();
        assert!(bo_feed.is_empty());
    }
}
