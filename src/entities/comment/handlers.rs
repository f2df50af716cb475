//! Comment HTTP handlers
//!
//! Every comment route requires an authenticated caller; editing and
//! deleting additionally require the caller to own the comment.

use super::model::{Comment, CreateComment, UpdateComment};
use crate::core::auth::{AccessGate, Operation, Resource};
use crate::core::error::{CatalogError, Result};
use crate::core::extractors::{Caller, parse_id};
use crate::core::validation::ValidatedJson;
use crate::serialization::{CommentView, Expansion};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

pub async fn list_comments(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Comment, Operation::List, None)?;

    let comments = host.comments.list().await?;
    Ok(Json(host.renderer.comments(&comments, Expansion::Flat).await?))
}

pub async fn get_comment(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Comment, Operation::Read, None)?;

    let comment = host.comments.fetch(&parse_id(&id)?).await?;
    Ok(Json(host.renderer.comment(&comment, Expansion::Flat).await?))
}

pub async fn create_comment(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    payload: std::result::Result<ValidatedJson<CreateComment>, CatalogError>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Comment, Operation::Create, None)?;
    let owner_id = ctx.require_user()?;
    let ValidatedJson(payload) = payload?;

    let comment = host
        .comments
        .create(Comment::new(payload.text, payload.course, owner_id))
        .await?;
    tracing::info!(comment_id = %comment.id, course_id = %comment.course_id, "comment created");

    Ok((StatusCode::CREATED, Json(CommentView::from(&comment))))
}

pub async fn update_comment(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    payload: std::result::Result<ValidatedJson<UpdateComment>, CatalogError>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Comment, Operation::Update, None)?;
    let id = parse_id(&id)?;

    let owner_id = host.comments.fetch(&id).await?.owner_id;
    AccessGate::authorize(&ctx, Resource::Comment, Operation::Update, Some(owner_id))?;
    let ValidatedJson(changes) = payload?;

    // Checked again against the locked record.
    let comment = host
        .comments
        .update(
            &id,
            Box::new(move |comment: &mut Comment| {
                AccessGate::authorize(&ctx, Resource::Comment, Operation::Update, Some(comment.owner_id))?;
                comment.apply(changes);
                Ok(())
            }),
        )
        .await?;

    Ok((StatusCode::ACCEPTED, Json(CommentView::from(&comment))))
}

pub async fn delete_comment(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    AccessGate::authorize(&ctx, Resource::Comment, Operation::Delete, None)?;
    let id = parse_id(&id)?;

    let comment = host.comments.fetch(&id).await?;
    AccessGate::authorize(&ctx, Resource::Comment, Operation::Delete, Some(comment.owner_id))?;

    host.comments.delete(&id).await?;
    tracing::info!(comment_id = %id, "comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
