//! Synthetic articles for development databases.

use crate::models::{Article, ArticleFields};
use diesel::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

pub const DEFAULT_COUNT: usize = 50;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

fn sentence<R: Rng + ?Sized>(rng: &mut R, length: Range<usize>) -> String {
    let count = rng.gen_range(length);
    let mut words = Vec::with_capacity(count);
    for _ in 0..count {
        if let Some(word) = WORDS.choose(rng) {
            words.push(*word);
        }
    }
    let mut sentence = words.join(" ");
    if let Some(first) = sentence.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    sentence.push('.');
    sentence
}

/// A 4 to 9 word title, 3 to 6 sentences of content and a coin flip for `published`.
pub fn fake_fields<R: Rng + ?Sized>(rng: &mut R) -> ArticleFields {
    let title = sentence(rng, 4..10);
    let paragraph_length = rng.gen_range(3..7);
    let mut sentences = Vec::with_capacity(paragraph_length);
    for _ in 0..paragraph_length {
        sentences.push(sentence(rng, 6..16));
    }
    ArticleFields {
        title,
        content: sentences.join(" "),
        published: Some(rng.gen_bool(0.5)),
    }
}

/// Inserts `count` generated articles in a single transaction.
pub fn seed_articles<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    count: usize,
    rng: &mut R,
) -> QueryResult<Vec<Article>> {
    conn.transaction(|conn| {
        let mut articles = Vec::with_capacity(count);
        for _ in 0..count {
            articles.push(Article::create(conn, &fake_fields(rng))?);
        }
        Ok(articles)
    })
}
