//! Course HTTP handlers

use super::model::{Course, CourseFilter, CreateCourse, UpdateCourse};
use crate::core::auth::{AccessGate, Operation, Resource};
use crate::core::error::{CatalogError, Result};
use crate::core::extractors::{Caller, parse_id};
use crate::core::validation::ValidatedJson;
use crate::serialization::{CourseView, Expansion};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// `GET /courses?title=&author=`
pub async fn list_courses(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Query(filter): Query<CourseFilter>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Course, Operation::List, None)?;

    let courses = host.course_query.find_by_filters(&filter).await?;
    Ok(Json(host.renderer.courses(&courses, Expansion::Populated).await?))
}

pub async fn get_course(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Course, Operation::Read, None)?;

    let course = host.courses.fetch(&parse_id(&id)?).await?;
    Ok(Json(host.renderer.course(&course, Expansion::Populated).await?))
}

/// The owner is always the caller, whatever the body says
pub async fn create_course(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    payload: std::result::Result<ValidatedJson<CreateCourse>, CatalogError>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Course, Operation::Create, None)?;
    let owner_id = ctx.require_user()?;
    let ValidatedJson(payload) = payload?;

    let course = host.courses.create(Course::new(payload, owner_id)).await?;
    tracing::info!(course_id = %course.id, owner_id = %owner_id, "course created");

    Ok((StatusCode::CREATED, Json(CourseView::from(&course))))
}

pub async fn update_course(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    payload: std::result::Result<ValidatedJson<UpdateCourse>, CatalogError>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Course, Operation::Update, None)?;
    let id = parse_id(&id)?;
    let ValidatedJson(changes) = payload?;

    let course = host
        .courses
        .update(
            &id,
            Box::new(move |course: &mut Course| {
                course.apply(changes);
                Ok(())
            }),
        )
        .await?;

    Ok((StatusCode::ACCEPTED, Json(CourseView::from(&course))))
}

pub async fn delete_course(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    AccessGate::authorize(&ctx, Resource::Course, Operation::Delete, None)?;
    let id = parse_id(&id)?;

    host.courses.delete(&id).await?;
    tracing::info!(course_id = %id, "course deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Save a course to the caller's profile
pub async fn add_course_to_profile(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Profile, Operation::Update, None)?;
    let user_id = ctx.require_user()?;
    let course_id = parse_id(&id)?;

    host.accounts.add_saved_course(&user_id, &course_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "detail": "Course added successfully." })),
    ))
}

/// Remove a course from the caller's profile
pub async fn remove_course_from_profile(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Profile, Operation::Update, None)?;
    let user_id = ctx.require_user()?;
    let course_id = parse_id(&id)?;

    host.accounts.remove_saved_course(&user_id, &course_id).await?;

    Ok(Json(json!({ "message": "Course removed from profile" })))
}

/// Courses a user has saved to their profile, flat
pub async fn list_user_courses(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Course, Operation::List, None)?;

    let courses = host.accounts.saved_courses(&parse_id(&user_id)?).await?;
    Ok(Json(courses.iter().map(CourseView::from).collect::<Vec<_>>()))
}
