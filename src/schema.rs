table! {
    articles (id) {
        id -> Integer,
        title -> Text,
        content -> Text,
        published -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}
