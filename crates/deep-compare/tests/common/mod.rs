//! Shared fixtures for the comparison integration tests.

#![allow(dead_code)]

use std::cell::OnceCell;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};
use deep_compare::{reflect_struct, Dyn};

/// Install a test logger so `RUST_LOG=deep_compare=trace` shows the walk.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Basic {
    pub x: i64,
    pub y: f32,
}

reflect_struct!(Basic { x, y });

/// Same shape as [`Basic`], different type.
pub struct NotBasic {
    pub x: i64,
    pub y: f32,
}

reflect_struct!(NotBasic { x, y });

#[derive(Default)]
pub struct Tagged {
    pub f1: String,
    pub f2: String,
}

reflect_struct!(Tagged {
    f1 [cmp = "-"],
    f2 [cmp = "+"],
});

pub fn tagged(f1: &str, f2: &str) -> Tagged {
    Tagged {
        f1: f1.to_string(),
        f2: f2.to_string(),
    }
}

pub struct Author {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
}

reflect_struct!(Author {
    first_name,
    last_name,
    middle_name,
});

pub struct Publisher {
    pub name: String,
    pub hq: Dyn,
}

reflect_struct!(Publisher { name, hq });

pub struct Book {
    pub isbn: Dyn,
    pub title: String,
    pub released_at: DateTime<Utc>,
    pub authors: Vec<Box<Author>>,
    pub publisher: Box<Publisher>,
}

reflect_struct!(Book {
    isbn,
    title,
    released_at,
    authors,
    publisher,
});

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid date {year}-{month}-{day}"))
}

pub fn kafka_original() -> Box<Book> {
    Box::new(Book {
        isbn: Dyn::new(4101001545i64),
        title: "海辺のカフカ".to_string(),
        released_at: date(2005, 3, 1),
        authors: vec![Box::new(Author {
            first_name: "春樹".to_string(),
            last_name: "村上".to_string(),
            middle_name: String::new(),
        })],
        publisher: Box::new(Publisher {
            name: "新潮社".to_string(),
            hq: Dyn::new("JP"),
        }),
    })
}

pub fn kafka_translation() -> Box<Book> {
    Box::new(Book {
        isbn: Dyn::new("0099458322"),
        title: "Kafka on the Shore".to_string(),
        released_at: date(2005, 10, 6),
        authors: vec![Box::new(Author {
            first_name: "Haruki".to_string(),
            last_name: "Murakami".to_string(),
            middle_name: String::new(),
        })],
        publisher: Box::new(Publisher {
            name: "Vintage".to_string(),
            hq: Dyn::nil(),
        }),
    })
}

/// Shared, possibly self-referential link.
pub type Link = Rc<OnceCell<Node>>;

pub struct Node {
    pub label: u32,
    pub next: Link,
}

reflect_struct!(Node { label, next });

/// Two nodes pointing at each other. The cycle is leaked.
pub fn node_loop(first: u32, second: u32) -> (Link, Link) {
    let a: Link = Rc::new(OnceCell::new());
    let b: Link = Rc::new(OnceCell::new());
    let _ = a.set(Node {
        label: first,
        next: Rc::clone(&b),
    });
    let _ = b.set(Node {
        label: second,
        next: Rc::clone(&a),
    });
    (a, b)
}

/// Link whose value is a polymorphic holder.
pub type DynLink = Rc<OnceCell<Dyn>>;

/// Two polymorphic holders each containing the other. The cycle is leaked.
pub fn dyn_loop() -> (DynLink, DynLink) {
    let a: DynLink = Rc::new(OnceCell::new());
    let b: DynLink = Rc::new(OnceCell::new());
    let _ = a.set(Dyn::new(Rc::clone(&b)));
    let _ = b.set(Dyn::new(Rc::clone(&a)));
    (a, b)
}
