use crate::error::ApiError;
use crate::models::Article;
use actix_web::{web, HttpResponse};
use serde::Serialize;
pub mod articles;

/// Envelope shared by every successful response.
#[derive(Serialize, Debug)]
pub struct Response<T> {
    pub success: bool,
    #[serde(flatten)]
    pub result: T,
}

impl<T> Response<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum ResponseResult {
    ArticleList {
        articles: Vec<Article>,
    },
    ArticleShow {
        article: Article,
    },
    ArticleChange {
        message: &'static str,
        article: Article,
    },
}

/// Registers the article routes, the JSON body policy and the fallback 404.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::MalformedBody(err.to_string()).into());
    cfg.app_data(json_config)
        .service(articles::list_articles)
        .service(articles::get_article)
        .service(articles::create_article)
        .service(articles::update_article)
        .service(articles::delete_article)
        .default_service(web::to(not_found));
}

pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NoRoute)
}


#[cfg(test)]
mod envelope_tests {
    use super::*;

    #[test]
    fn test_envelope_flattens_result() {
        let resp = Response::ok(ResponseResult::ArticleList { articles: vec![] });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "articles": []}));
    }
}
