//! Student endpoints.
//!
//! Students are optional buyers; a sale may carry a `student_ref` pointing
//! at one, but nothing checks that it still exists.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use minimart_core::validation::{
    validate_optional_label, validate_search_query, validate_student_name,
};
use minimart_core::{NewStudent, Student, ValidationError};

use crate::error::ApiError;
use crate::routes::{CreatedResponse, SearchParams};
use crate::state::AppState;

/// Body of `POST /api/students`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub class_name: Option<String>,
    pub student_id: Option<String>,
}

impl CreateStudentRequest {
    pub fn into_new_student(self) -> Result<NewStudent, ValidationError> {
        validate_student_name(&self.name)?;
        validate_optional_label("class_name", self.class_name.as_deref())?;
        validate_optional_label("student_id", self.student_id.as_deref())?;

        Ok(NewStudent {
            name: self.name.trim().to_string(),
            class_name: self.class_name,
            student_id: self.student_id,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub class_name: Option<String>,
    pub student_id: Option<String>,
    pub created_at: String,
}

impl From<Student> for StudentResponse {
    fn from(s: Student) -> Self {
        StudentResponse {
            created_at: s.created_at.to_rfc3339(),
            id: s.id,
            name: s.name,
            class_name: s.class_name,
            student_id: s.student_id,
        }
    }
}

pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let store = state.store()?;
    let Json(request) = payload?;

    let student = store.insert_student(&request.into_new_student()?).await?;
    info!(id = %student.id, "Student created via API");

    Ok(Json(CreatedResponse { id: student.id }))
}

/// Lists students, filtered by a case-insensitive match on the name.
pub async fn list_students(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let store = state.store()?;
    let Query(params) = params?;
    let query = validate_search_query(params.q.as_deref())?;

    let students = store.list_students(query.as_deref()).await?;
    debug!(query = ?query, count = students.len(), "list_students");

    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let req = CreateStudentRequest {
            name: "   ".to_string(),
            class_name: Some("7A".to_string()),
            student_id: None,
        };
        assert!(req.into_new_student().is_err());
    }
}
