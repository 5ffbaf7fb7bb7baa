use super::{Response, ResponseResult};
use crate::db::DbPool;
use crate::error::ApiError;
use crate::extractors::BoundArticle;
use crate::models::{Article, ArticleFields, FILLABLE};
use actix_web::{delete, get, post, put, web, HttpResponse};
use log::{debug, info};
use serde_json::{Map, Value};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const TITLE_MAX_LENGTH: usize = 225;

pub const ARTICLE_CREATED: &str = "Article created successfully";
pub const ARTICLE_UPDATED: &str = "Article updated successfully";
pub const ARTICLE_DELETED: &str = "Article deleted successfully";

/// Raw fillable attributes of a create or update body.
///
/// A `null` title or content counts as absent; a `null` published is kept so
/// that the boolean rule rejects it.
#[derive(Validate, Debug, Default)]
pub struct ArticleRequest {
    #[validate(
        required(message = "The title field is required."),
        custom = "validate_title"
    )]
    pub title: Option<Value>,
    #[validate(
        required(message = "The content field is required."),
        custom = "validate_content"
    )]
    pub content: Option<Value>,
    #[validate(custom = "validate_published")]
    pub published: Option<Value>,
}

impl ArticleRequest {
    pub fn from_payload(mut payload: Map<String, Value>) -> Self {
        let ignored: Vec<&str> = payload
            .keys()
            .map(String::as_str)
            .filter(|key| !FILLABLE.contains(key))
            .collect();
        if !ignored.is_empty() {
            debug!("ignoring non-fillable attributes: {:?}", ignored);
        }
        let title = payload.remove("title").filter(|value| !value.is_null());
        let content = payload.remove("content").filter(|value| !value.is_null());
        Self {
            title,
            content,
            published: payload.remove("published"),
        }
    }

    pub fn into_fields(self) -> Result<ArticleFields, ApiError> {
        self.validate()?;
        let title = self.title.as_ref().and_then(title_text);
        let content = self.content.as_ref().and_then(content_text);
        match (title, content) {
            (Some(title), Some(content)) => Ok(ArticleFields {
                title,
                content,
                published: self.published.as_ref().and_then(coerce_bool),
            }),
            // `validate` rejects a missing, blank or non-string title and a blank content
            _ => unreachable!("validated request without title or content"),
        }
    }
}

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Accepts `true`, `false`, `1`, `0`, `"1"` and `"0"`.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Trimmed title, or `None` when it is not a string or is blank.
fn title_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

/// Text stored for a content value, or `None` when it is blank.
///
/// Strings are trimmed, booleans become `"1"`/`"0"`, numbers and non-empty
/// arrays or objects keep their JSON text.
fn content_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_owned(),
        Value::Bool(true) => "1".to_owned(),
        Value::Bool(false) => "0".to_owned(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.is_empty() => return None,
        Value::Object(map) if map.is_empty() => return None,
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn validate_title(title: &Value) -> Result<(), ValidationError> {
    let title = match title {
        Value::String(title) => title.trim(),
        _ => return Err(invalid("string", "The title field must be a string.")),
    };
    if title.is_empty() {
        return Err(invalid("required", "The title field is required."));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(invalid(
            "max",
            format!(
                "The title field must not be greater than {} characters.",
                TITLE_MAX_LENGTH
            ),
        ));
    }
    Ok(())
}

fn validate_content(content: &Value) -> Result<(), ValidationError> {
    match content_text(content) {
        Some(_) => Ok(()),
        None => Err(invalid("required", "The content field is required.")),
    }
}

fn validate_published(published: &Value) -> Result<(), ValidationError> {
    match coerce_bool(published) {
        Some(_) => Ok(()),
        None => Err(invalid("boolean", "The published field must be true or false.")),
    }
}

#[get("/article")]
pub async fn list_articles(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let articles = web::block(move || -> Result<Vec<Article>, ApiError> {
        let mut conn = pool.get()?;
        Ok(Article::all(&mut conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(Response::ok(ResponseResult::ArticleList { articles })))
}

#[get("/article/{id}")]
pub async fn get_article(article: BoundArticle) -> HttpResponse {
    HttpResponse::Ok().json(Response::ok(ResponseResult::ArticleShow {
        article: article.into_inner(),
    }))
}

#[post("/article")]
pub async fn create_article(
    pool: web::Data<DbPool>,
    payload: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    let fields = ArticleRequest::from_payload(payload.into_inner()).into_fields()?;
    let article = web::block(move || -> Result<Article, ApiError> {
        let mut conn = pool.get()?;
        Ok(Article::create(&mut conn, &fields)?)
    })
    .await??;
    info!("created article {}", article.id);
    Ok(HttpResponse::Created().json(Response::ok(ResponseResult::ArticleChange {
        message: ARTICLE_CREATED,
        article,
    })))
}

#[put("/article/{id}")]
pub async fn update_article(
    article: BoundArticle,
    pool: web::Data<DbPool>,
    payload: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    let fields = ArticleRequest::from_payload(payload.into_inner()).into_fields()?;
    let id = article.id;
    let article = web::block(move || -> Result<Option<Article>, ApiError> {
        let mut conn = pool.get()?;
        Ok(Article::update_by_id(&mut conn, id, &fields)?)
    })
    .await??
    .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
    info!("updated article {}", id);
    Ok(HttpResponse::Ok().json(Response::ok(ResponseResult::ArticleChange {
        message: ARTICLE_UPDATED,
        article,
    })))
}

#[delete("/article/{id}")]
pub async fn delete_article(
    article: BoundArticle,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let article = article.into_inner();
    let id = article.id;
    let deleted = web::block(move || -> Result<bool, ApiError> {
        let mut conn = pool.get()?;
        Ok(Article::delete_by_id(&mut conn, id)?)
    })
    .await??;
    if !deleted {
        return Err(ApiError::NotFound(id.to_string()));
    }
    info!("deleted article {}", id);
    Ok(HttpResponse::Ok().json(Response::ok(ResponseResult::ArticleChange {
        message: ARTICLE_DELETED,
        article,
    })))
}
