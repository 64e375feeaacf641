//! Blog posts shown on the home page.
//!
//! Posts are not persisted; the home page lists a fixed set.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub author: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub date_posted: &'static str,
}

const SAMPLE_POSTS: &[Post] = &[
    Post {
        author: "Corey Schafer",
        title: "Blog Post 1",
        content: "First post content",
        date_posted: "April 20, 2018",
    },
    Post {
        author: "WOLOLO",
        title: "Blog Post 2",
        content: "Second post content",
        date_posted: "April 21, 2018",
    },
];

/// Posts in display order.
pub fn posts() -> &'static [Post] {
    SAMPLE_POSTS
}
