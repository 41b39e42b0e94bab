//! # Student Repository
//!
//! Students are optional: a sale may name one by id, or nobody at all.
//! Records are immutable after insert.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{fold_case, like_pattern};
use crate::error::DbResult;
use minimart_core::{NewStudent, Student};

/// Repository for student database operations.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    pool: SqlitePool,
}

impl StudentRepository {
    /// Creates a new StudentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StudentRepository { pool }
    }

    /// Inserts a student and returns it with its generated id.
    pub async fn insert(&self, new: &NewStudent) -> DbResult<Student> {
        let student = Student {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            class_name: new.class_name.clone(),
            student_id: new.student_id.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO students (id, name, class_name, student_id, created_at, name_folded)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.class_name)
        .bind(&student.student_id)
        .bind(student.created_at)
        .bind(fold_case(&student.name))
        .execute(&self.pool)
        .await?;

        info!(id = %student.id, "Student created");
        Ok(student)
    }

    /// Lists students ordered by name; `Some(q)` keeps names containing `q`
    /// (case-insensitive, literal match).
    pub async fn list(&self, query: Option<&str>) -> DbResult<Vec<Student>> {
        debug!(query = ?query, "Listing students");

        let students = match query {
            None => {
                sqlx::query_as::<_, Student>(
                    r#"
                    SELECT id, name, class_name, student_id, created_at FROM students
                    ORDER BY name, id
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
            Some(q) => {
                sqlx::query_as::<_, Student>(
                    r#"
                    SELECT id, name, class_name, student_id, created_at FROM students
                    WHERE name_folded LIKE ?1 ESCAPE '\'
                    ORDER BY name, id
                    "#,
                )
                .bind(like_pattern(q))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(students)
    }
}
