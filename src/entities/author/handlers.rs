//! Author HTTP handlers

use super::model::{Author, CreateAuthor, UpdateAuthor};
use crate::core::auth::{AccessGate, Operation, Resource};
use crate::core::error::{CatalogError, Result};
use crate::core::extractors::{Caller, parse_id};
use crate::core::validation::ValidatedJson;
use crate::serialization::{AuthorView, CourseRepr, Expansion};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

pub async fn list_authors(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Author, Operation::List, None)?;

    let authors = host.authors.list().await?;
    Ok(Json(host.renderer.authors(&authors, Expansion::Populated).await?))
}

pub async fn get_author(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Author, Operation::Read, None)?;

    let author = host.authors.fetch(&parse_id(&id)?).await?;
    Ok(Json(host.renderer.author(&author, Expansion::Populated).await?))
}

pub async fn create_author(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    payload: std::result::Result<ValidatedJson<CreateAuthor>, CatalogError>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Author, Operation::Create, None)?;
    let ValidatedJson(payload) = payload?;

    let author = host.authors.create(Author::from(payload)).await?;
    tracing::info!(author_id = %author.id, name = %author.name, "author created");

    Ok((StatusCode::CREATED, Json(AuthorView::from(&author))))
}

pub async fn update_author(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    payload: std::result::Result<ValidatedJson<UpdateAuthor>, CatalogError>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Author, Operation::Update, None)?;
    let id = parse_id(&id)?;
    let ValidatedJson(changes) = payload?;

    let author = host
        .authors
        .update(
            &id,
            Box::new(move |author: &mut Author| {
                author.apply(changes);
                Ok(())
            }),
        )
        .await?;

    Ok((StatusCode::ACCEPTED, Json(AuthorView::from(&author))))
}

pub async fn delete_author(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    AccessGate::authorize(&ctx, Resource::Author, Operation::Delete, None)?;
    let id = parse_id(&id)?;

    host.authors.delete(&id).await?;
    tracing::info!(author_id = %id, "author deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Every course written by an author, populated
pub async fn list_author_courses(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<CourseRepr>>> {
    AccessGate::authorize(&ctx, Resource::Course, Operation::List, None)?;

    let author = host.authors.fetch(&parse_id(&id)?).await?;
    let courses = host.graph.courses_by_author(&author.id).await?;

    Ok(Json(host.renderer.courses(&courses, Expansion::Populated).await?))
}
