use std::fmt::Write;

use super::escape;
use crate::domain::Post;

/// Post list for the home page.
pub fn home(posts: &[Post]) -> String {
    let mut html = String::new();
    for post in posts {
        let _ = write!(
            html,
            r#"<article class="media content-section">
<div class="article-metadata"><span class="author">{}</span> <small class="text-muted">{}</small></div>
<h2 class="article-title">{}</h2>
<p class="article-content">{}</p>
</article>
"#,
            escape(post.author),
            escape(post.date_posted),
            escape(post.title),
            escape(post.content),
        );
    }
    html
}

pub fn about() -> String {
    r#"<div class="content-section"><h1>About Page</h1></div>"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::posts;

    #[test]
    fn test_home_lists_every_post() {
        let html = home(posts());
        for post in posts() {
            assert!(html.contains(post.title));
            assert!(html.contains(post.author));
        }
        assert_eq!(html.matches("<article").count(), posts().len());
    }
}
