use crate::schema::articles;
use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// Attributes a client request may set. Everything else is assigned by the store.
pub const FILLABLE: [&str; 3] = ["title", "content", "published"];

#[derive(Serialize, Queryable, Debug, Clone, PartialEq)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published: bool,
    #[serde(serialize_with = "utc_timestamp::serialize")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "utc_timestamp::serialize")]
    pub updated_at: NaiveDateTime,
}

/// Validated values of the fillable attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleFields {
    pub title: String,
    pub content: String,
    pub published: Option<bool>,
}

#[derive(Insertable)]
#[diesel(table_name = articles)]
struct NewArticle<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// `published: None` leaves the column as it is.
#[derive(AsChangeset)]
#[diesel(table_name = articles)]
struct ArticleChangeset<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub published: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Article {
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        articles::table.order(articles::id.asc()).load::<Self>(conn)
    }

    pub fn find_by_id(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Self>> {
        articles::table.find(id).first::<Self>(conn).optional()
    }

    /// Inserts a new row, defaulting `published` to false.
    pub fn create(conn: &mut SqliteConnection, fields: &ArticleFields) -> QueryResult<Self> {
        let now = Utc::now().naive_utc();
        let new_article = NewArticle {
            title: &fields.title,
            content: &fields.content,
            published: fields.published.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };
        conn.transaction(|conn| {
            diesel::insert_into(articles::table)
                .values(&new_article)
                .execute(conn)?;
            articles::table
                .order(articles::id.desc())
                .first::<Self>(conn)
        })
    }

    /// Returns `None` when no row has the given id.
    pub fn update_by_id(
        conn: &mut SqliteConnection,
        id: i32,
        fields: &ArticleFields,
    ) -> QueryResult<Option<Self>> {
        let changeset = ArticleChangeset {
            title: &fields.title,
            content: &fields.content,
            published: fields.published,
            updated_at: Utc::now().naive_utc(),
        };
        conn.transaction(|conn| {
            let updated = diesel::update(articles::table.find(id))
                .set(&changeset)
                .execute(conn)?;
            if updated == 0 {
                return Ok(None);
            }
            articles::table.find(id).first::<Self>(conn).map(Some)
        })
    }

    /// Returns whether a row was deleted.
    pub fn delete_by_id(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
        let deleted = diesel::delete(articles::table.find(id)).execute(conn)?;
        Ok(deleted > 0)
    }
}

mod utc_timestamp {
    //! Store timestamps are naive UTC; clients get ISO-8601 with an explicit `Z`.
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format("%Y-%m-%dT%H:%M:%S%.6fZ"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use chrono::DateTime;

    fn fields(title: &str, content: &str, published: Option<bool>) -> ArticleFields {
        ArticleFields {
            title: title.to_owned(),
            content: content.to_owned(),
            published,
        }
    }

    #[test]
    fn test_create_article() {
        let (_dir, pool) = create_test_pool();
        let mut conn = pool.get().unwrap();
        let article =
            Article::create(&mut conn, &fields("Hello", "World", Some(true))).expect("must succeed");
        assert!(article.id > 0);
        assert_eq!(article.title, "Hello");
        assert_eq!(article.content, "World");
        assert!(article.published);
        assert_eq!(article.created_at, article.updated_at);
        let found = Article::find_by_id(&mut conn, article.id)
            .expect("must succeed")
            .expect("must exist");
        assert_eq!(found, article);
    }

    #[test]
    fn test_create_defaults_published_to_false() {
        let (_dir, pool) = create_test_pool();
        let mut conn = pool.get().unwrap();
        let article = Article::create(&mut conn, &fields("a", "b", None)).expect("must succeed");
        assert!(!article.published);
    }

    #[test]
    fn test_all_in_id_order() {
        let (_dir, pool) = create_test_pool();
        let mut conn = pool.get().unwrap();
        assert!(Article::all(&mut conn).expect("must succeed").is_empty());
        let first = Article::create(&mut conn, &fields("first", "1", None)).unwrap();
        let second = Article::create(&mut conn, &fields("second", "2", None)).unwrap();
        let all = Article::all(&mut conn).expect("must succeed");
        assert_eq!(
            all.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    #[test]
    fn test_update_by_id() {
        let (_dir, pool) = create_test_pool();
        let mut conn = pool.get().unwrap();
        let article = Article::create(&mut conn, &fields("old", "old body", Some(true))).unwrap();
        let updated = Article::update_by_id(&mut conn, article.id, &fields("new", "new body", None))
            .expect("must succeed")
            .expect("must exist");
        assert_eq!(updated.id, article.id);
        assert_eq!(updated.title, "new");
        assert_eq!(updated.content, "new body");
        // omitted `published` keeps the stored value
        assert!(updated.published);
        assert_eq!(updated.created_at, article.created_at);
        assert!(updated.updated_at >= article.updated_at);

        let updated =
            Article::update_by_id(&mut conn, article.id, &fields("new", "new body", Some(false)))
                .unwrap()
                .unwrap();
        assert!(!updated.published);
    }

    #[test]
    fn test_update_missing_article() {
        let (_dir, pool) = create_test_pool();
        let mut conn = pool.get().unwrap();
        let updated = Article::update_by_id(&mut conn, 9999, &fields("a", "b", None))
            .expect("must succeed");
        assert!(updated.is_none());
    }

    #[test]
    fn test_delete_by_id() {
        let (_dir, pool) = create_test_pool();
        let mut conn = pool.get().unwrap();
        let article = Article::create(&mut conn, &fields("a", "b", None)).unwrap();
        assert!(Article::delete_by_id(&mut conn, article.id).expect("must succeed"));
        assert!(Article::find_by_id(&mut conn, article.id).unwrap().is_none());
        assert!(!Article::delete_by_id(&mut conn, article.id).expect("must succeed"));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let (_dir, pool) = create_test_pool();
        let mut conn = pool.get().unwrap();
        let first = Article::create(&mut conn, &fields("a", "b", None)).unwrap();
        Article::delete_by_id(&mut conn, first.id).unwrap();
        let second = Article::create(&mut conn, &fields("a", "b", None)).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_serialized_shape() {
        let (_dir, pool) = create_test_pool();
        let mut conn = pool.get().unwrap();
        let article = Article::create(&mut conn, &fields("Hello", "World", Some(true))).unwrap();
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["id"], article.id);
        assert_eq!(json["published"], true);
        let created_at = json["created_at"].as_str().expect("must be a string");
        assert!(created_at.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(created_at).is_ok());
    }
}
