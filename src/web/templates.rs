use crate::db::{AuthorDisplay, Category, CategoryDisplay, Comment, CoolUser, Post, PostActivity};

/// Escape text for interpolation into HTML.
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Base HTML layout.
fn base_layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="color-scheme" content="light dark">
    <title>{title} - CoolPress</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css">
</head>
<body>
    <header class="container">
        <nav>
            <ul>
                <li><a href="/"><strong>CoolPress</strong></a></li>
            </ul>
            <ul>
                <li><a href="/posts">Posts</a></li>
                <li><a href="/trending">Trending</a></li>
                <li><a href="/authors">Authors</a></li>
            </ul>
        </nav>
    </header>
    <main class="container">
        {content}
    </main>
    <footer class="container">
        <small>CoolPress</small>
    </footer>
</body>
</html>"#,
        title = escape_html(title),
    )
}

fn render_post_card(post: &Post) -> String {
    let image = post.image_link.as_deref().map_or_else(String::new, |link| {
        format!(
            r#"<img src="{}" alt="" style="max-height: 10em;">"#,
            escape_html(link)
        )
    });
    let body = post.body.as_deref().unwrap_or("");
    let snippet: String = body.chars().take(280).collect();

    format!(
        r#"<article>
            <h3><a href="/posts/{id}">{title}</a></h3>
            {image}
            <p>{snippet}</p>
        </article>"#,
        id = post.id,
        title = escape_html(&post.title),
        snippet = escape_html(&snippet),
    )
}

/// Render home page: categories with counts plus the latest posts.
pub fn render_home(categories: &[CategoryDisplay], posts: &[Post]) -> String {
    let mut content = String::from("<h1>Categories</h1><ul>");
    for display in categories {
        content.push_str(&format!(
            r#"<li><a href="/categories/{slug}">{label}</a> ({count})</li>"#,
            slug = escape_html(&display.category.slug),
            label = escape_html(&display.category.label),
            count = display.post_count,
        ));
    }
    content.push_str("</ul><h1>Latest Posts</h1>");

    if posts.is_empty() {
        content.push_str("<p>No posts yet.</p>");
    } else {
        for post in posts {
            content.push_str(&render_post_card(post));
        }
    }

    base_layout("Home", &content)
}

/// Render a plain list of posts under a heading.
pub fn render_posts_list(heading: &str, posts: &[Post]) -> String {
    let mut content = format!("<h1>{}</h1>", escape_html(heading));

    if posts.is_empty() {
        content.push_str("<p>No posts yet.</p>");
    } else {
        for post in posts {
            content.push_str(&render_post_card(post));
        }
    }

    base_layout(heading, &content)
}

/// Render the post detail page with its comments and top-comment stats.
pub fn render_post_detail(
    post: &Post,
    author: &CoolUser,
    category: &Category,
    comments: &[Comment],
    stats: &[(Comment, i64)],
) -> String {
    let mut content = format!(
        r#"<article>
            <h1>{title}</h1>
            <p><a href="/authors/{username}">{username}</a> in <a href="/categories/{slug}">{label}</a></p>
            <p>{body}</p>
        </article>"#,
        title = escape_html(&post.title),
        username = escape_html(&author.username),
        slug = escape_html(&category.slug),
        label = escape_html(&category.label),
        body = escape_html(post.body.as_deref().unwrap_or("")),
    );

    if !stats.is_empty() {
        content.push_str("<h2>Top comments</h2><ol>");
        for (comment, score) in stats {
            content.push_str(&format!(
                "<li>{} <small>(score {})</small></li>",
                escape_html(&comment.body),
                score,
            ));
        }
        content.push_str("</ol>");
    }

    content.push_str(&format!("<h2>Comments ({})</h2>", comments.len()));
    for comment in comments {
        content.push_str(&format!(
            r#"<article><p>{body}</p><small>{votes} votes | {date}</small></article>"#,
            body = escape_html(&comment.body),
            votes = comment.votes,
            date = escape_html(&comment.creation_date),
        ));
    }

    content.push_str(&format!(
        r#"<h2>Add a comment</h2>
        <form method="post" action="/posts/{id}/comments">
            <input type="text" name="username" placeholder="Username" required>
            <textarea name="body" placeholder="Your comment" required></textarea>
            <input type="number" name="votes" value="10">
            <button type="submit">Comment</button>
        </form>"#,
        id = post.id,
    ));

    base_layout(&post.title, &content)
}

/// Render the trending posts page.
pub fn render_trending(rows: &[PostActivity]) -> String {
    let mut content = String::from("<h1>Trending</h1>");

    if rows.is_empty() {
        content.push_str("<p>Nothing trending right now.</p>");
    } else {
        for row in rows {
            content.push_str(&format!(
                r#"<article>
                    <h3><a href="/posts/{id}">{title}</a></h3>
                    <small>{count} comments, last activity {latest}</small>
                </article>"#,
                id = row.post.id,
                title = escape_html(&row.post.title),
                count = row.comment_count,
                latest = escape_html(row.latest_comment_at.as_deref().unwrap_or("never")),
            ));
        }
    }

    base_layout("Trending", &content)
}

/// Render the authors listing.
pub fn render_authors(authors: &[AuthorDisplay]) -> String {
    let mut content = String::from("<h1>Authors</h1><ul>");
    for display in authors {
        content.push_str(&format!(
            r#"<li><a href="/authors/{username}">{username}</a> ({count} posts)</li>"#,
            username = escape_html(&display.user.username),
            count = display.post_count,
        ));
    }
    content.push_str("</ul>");

    base_layout("Authors", &content)
}

/// Render an author's page: enrichment metadata when present, then posts.
pub fn render_author_detail(author: &CoolUser, posts: &[Post]) -> String {
    let mut content = format!("<h1>{}</h1>", escape_html(&author.username));

    if let Some(link) = author.gravatar_link.as_deref() {
        content.push_str(&format!(
            r#"<img src="{}" alt="avatar" width="80" height="80">"#,
            escape_html(link)
        ));
    }
    if let Some(profile) = author.github_profile.as_deref() {
        let mut line = format!("<p>GitHub: {}", escape_html(profile));
        if let Some(repos) = author.github_repos {
            line.push_str(&format!(" | {repos} repos"));
        }
        if let Some(stars) = author.github_stars {
            line.push_str(&format!(" | {stars} stars"));
        }
        line.push_str("</p>");
        content.push_str(&line);
    }

    content.push_str("<h2>Posts</h2>");
    if posts.is_empty() {
        content.push_str("<p>No published posts.</p>");
    } else {
        for post in posts {
            content.push_str(&render_post_card(post));
        }
    }

    base_layout(&author.username, &content)
}
