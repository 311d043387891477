use axum::Json;
use axum::extract::{Path, Query};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::db::repository::{self, Stats};
use crate::error::AppError;
use crate::models::{
    Conflict, Course, CourseFilter, CoursePayload, Day, Room, RoomPayload, Teacher, TeacherPayload,
};
use crate::scheduling;
use crate::services::{ImportOutcome, courses, import};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/courses/{id}", put(update_course).delete(delete_course))
        .route("/api/teachers", get(list_teachers).post(create_teacher))
        .route(
            "/api/teachers/{id}",
            put(update_teacher).delete(delete_teacher),
        )
        .route("/api/rooms", get(list_rooms).post(create_room))
        .route("/api/rooms/{id}", put(update_room).delete(delete_room))
        .route("/api/conflicts", get(list_conflicts))
        .route("/api/stats", get(stats))
        .route("/api/import/teachers", post(import_teachers))
        .route("/api/import/courses", post(import_courses))
        .route("/api/import/teachers/template", get(teachers_template))
        .route("/api/import/courses/template", get(courses_template))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
struct CourseQuery {
    year: Option<i64>,
    trimester: Option<i64>,
    teacher_id: Option<i64>,
    room_id: Option<i64>,
    day: Option<String>,
}

async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<Vec<Course>>, AppError> {
    let day = match query.day.as_deref() {
        Some(day) => Some(
            Day::parse(day)
                .ok_or_else(|| AppError::Validation("Valid day is required".to_string()))?,
        ),
        None => None,
    };
    let filter = CourseFilter {
        year: query.year,
        trimester: query.trimester,
        teacher_id: query.teacher_id,
        room_id: query.room_id,
        day,
    };
    let courses = repository::list_courses(&state.db, &filter).await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(payload): Json<CoursePayload>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let draft = payload.validate()?;
    let course = courses::create_course(&state.db, draft).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CoursePayload>,
) -> Result<Json<Course>, AppError> {
    let draft = payload.validate()?;
    let course = courses::update_course(&state.db, id, draft).await?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    repository::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_teachers(State(state): State<AppState>) -> Result<Json<Vec<Teacher>>, AppError> {
    let teachers = repository::list_teachers(&state.db).await?;
    Ok(Json(teachers))
}

async fn create_teacher(
    State(state): State<AppState>,
    Json(payload): Json<TeacherPayload>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let payload = payload.validate()?;
    let teacher = repository::insert_teacher(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TeacherPayload>,
) -> Result<Json<Teacher>, AppError> {
    let payload = payload.validate()?;
    let teacher = repository::update_teacher(&state.db, id, &payload).await?;
    Ok(Json(teacher))
}

async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    repository::delete_teacher(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = repository::list_rooms(&state.db).await?;
    Ok(Json(rooms))
}

async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<RoomPayload>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let payload = payload.validate()?;
    let room = repository::insert_room(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoomPayload>,
) -> Result<Json<Room>, AppError> {
    let payload = payload.validate()?;
    let room = repository::update_room(&state.db, id, &payload).await?;
    Ok(Json(room))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    repository::delete_room(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct ScopeQuery {
    year: Option<i64>,
    trimester: Option<i64>,
}

async fn list_conflicts(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Vec<Conflict>>, AppError> {
    let (Some(year), Some(trimester)) = (query.year, query.trimester) else {
        return Err(AppError::Validation(
            "Year and trimester are required".to_string(),
        ));
    };

    let filter = CourseFilter {
        year: Some(year),
        trimester: Some(trimester),
        ..CourseFilter::default()
    };
    let courses = repository::list_courses(&state.db, &filter).await?;
    Ok(Json(scheduling::detect_conflicts(&courses)))
}

async fn stats(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Stats>, AppError> {
    let scope = query.year.zip(query.trimester);
    let stats = repository::stats(&state.db, scope).await?;
    Ok(Json(stats))
}

async fn import_teachers(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, AppError> {
    match import::import_teachers(&state.db, &body).await? {
        ImportOutcome::Rejected(rejection) => {
            Ok((StatusCode::BAD_REQUEST, Json(rejection)).into_response())
        }
        ImportOutcome::Completed(report) => Ok(Json(report).into_response()),
    }
}

async fn import_courses(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, AppError> {
    match import::import_courses(&state.db, &body).await? {
        ImportOutcome::Rejected(rejection) => {
            Ok((StatusCode::BAD_REQUEST, Json(rejection)).into_response())
        }
        ImportOutcome::Completed(report) => Ok(Json(report).into_response()),
    }
}

const TEACHERS_TEMPLATE: &str = concat!(
    "name,department,email,phone\n",
    "\"Dr. John Smith\",\"Computer Science\",\"john.smith@university.edu\",\"555-1234\"\n",
    "\"Prof. Jane Doe\",\"Mathematics\",\"jane.doe@university.edu\",\"555-5678\"\n",
);

const COURSES_TEMPLATE: &str = concat!(
    "name,teacher_name,room_name,day,start_time,end_time,year,trimester\n",
    "\"Introduction to Programming\",\"Dr. John Smith\",\"A101\",\"Monday\",\"09:00\",\"10:30\",2025,1\n",
    "\"Advanced Mathematics\",\"Prof. Jane Doe\",\"B205\",\"Tuesday\",\"14:00\",\"15:30\",2025,1\n",
);

async fn teachers_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"teachers_template.csv\"",
            ),
        ],
        TEACHERS_TEMPLATE,
    )
}

async fn courses_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"courses_template.csv\"",
            ),
        ],
        COURSES_TEMPLATE,
    )
}
