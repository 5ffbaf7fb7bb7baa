use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::Article;
use actix_web::{dev, web, FromRequest, HttpRequest};
use anyhow::anyhow;
use futures::future::{FutureExt, LocalBoxFuture};
use std::ops::Deref;

/// The article named by the `{id}` path segment.
///
/// Resolution happens before the handler body runs: an id that is not an
/// integer, or that has no stored row, rejects the request with a 404.
#[derive(Debug)]
pub struct BoundArticle(pub Article);

impl BoundArticle {
    pub fn into_inner(self) -> Article {
        self.0
    }
}

impl Deref for BoundArticle {
    type Target = Article;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for BoundArticle {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut dev::Payload) -> Self::Future {
        let raw_id = req.match_info().get("id").unwrap_or_default().to_owned();
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        async move {
            let pool = pool.ok_or_else(|| anyhow!("database pool is not registered"))?;
            let id = match raw_id.parse::<i32>() {
                Ok(id) => id,
                Err(_) => return Err(ApiError::NotFound(raw_id)),
            };
            let article = web::block(move || -> Result<Option<Article>, ApiError> {
                let mut conn = pool.get()?;
                Ok(Article::find_by_id(&mut conn, id)?)
            })
            .await??;
            article.map(BoundArticle).ok_or(ApiError::NotFound(raw_id))
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::models::ArticleFields;
    use actix_web::{get, test, App, HttpResponse};

    #[get("/probe/{id}")]
    async fn probe(article: BoundArticle) -> HttpResponse {
        HttpResponse::Ok().body(article.title.clone())
    }

    #[actix_rt::test]
    async fn test_resolves_existing_article() {
        let (_dir, pool) = create_test_pool();
        let article = Article::create(
            &mut pool.get().unwrap(),
            &ArticleFields {
                title: "bound".to_owned(),
                content: "body".to_owned(),
                published: None,
            },
        )
        .unwrap();
        let app =
            test::init_service(App::new().app_data(web::Data::new(pool.clone())).service(probe))
                .await;
        let req = test::TestRequest::get()
            .uri(&format!("/probe/{}", article.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(test::read_body(resp).await, "bound");
    }

    #[actix_rt::test]
    async fn test_rejects_unknown_and_malformed_ids() {
        let (_dir, pool) = create_test_pool();
        let app =
            test::init_service(App::new().app_data(web::Data::new(pool.clone())).service(probe))
                .await;
        for uri in &["/probe/9999", "/probe/abc", "/probe/-1", "/probe/99999999999"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 404, "{}", uri);
        }
    }

    #[actix_rt::test]
    async fn test_missing_pool_is_server_error() {
        let app = test::init_service(App::new().service(probe)).await;
        let req = test::TestRequest::get().uri("/probe/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 500);
    }
}
