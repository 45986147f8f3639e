//! Aggregate statistics over a list of blogs
//!
//! Pure functions; ties are broken in favour of whatever comes first in the
//! input.

use crate::types::{AuthorBlogCount, AuthorLikeCount, BlogResponse, BlogStatistics, FavoriteBlog};

/// Sum of likes across all blogs, saturating at `i64::MAX`
pub fn total_likes(blogs: &[BlogResponse]) -> i64 {
    blogs
        .iter()
        .fold(0_i64, |total, blog| total.saturating_add(blog.likes))
}

/// The blog with the most likes
pub fn favorite_blog(blogs: &[BlogResponse]) -> Option<FavoriteBlog> {
    // max_by_key keeps the last maximum, so fold to keep the first
    let favorite = blogs.iter().fold(None::<&BlogResponse>, |best, blog| match best {
        Some(b) if b.likes >= blog.likes => Some(b),
        _ => Some(blog),
    })?;

    Some(FavoriteBlog {
        title: favorite.title.clone(),
        author: favorite.author.clone(),
        likes: favorite.likes,
    })
}

/// Per-author totals in first-seen order; blogs without a byline are skipped.
/// Totals saturate rather than overflow.
fn tally_by_author<F>(blogs: &[BlogResponse], value: F) -> Vec<(&str, i64)>
where
    F: Fn(&BlogResponse) -> i64,
{
    let mut tally: Vec<(&str, i64)> = Vec::new();
    for blog in blogs {
        let Some(author) = blog.author.as_deref() else {
            continue;
        };
        match tally.iter_mut().find(|(name, _)| *name == author) {
            Some((_, total)) => *total = total.saturating_add(value(blog)),
            None => tally.push((author, value(blog))),
        }
    }
    tally
}

fn first_max(tally: Vec<(&str, i64)>) -> Option<(String, i64)> {
    tally
        .into_iter()
        .fold(None::<(&str, i64)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        })
        .map(|(author, total)| (author.to_string(), total))
}

/// The author with the most blogs
pub fn most_blogs(blogs: &[BlogResponse]) -> Option<AuthorBlogCount> {
    first_max(tally_by_author(blogs, |_| 1)).map(|(author, count)| AuthorBlogCount {
        author,
        blogs: count as usize,
    })
}

/// The author whose blogs have the most likes in total
pub fn most_likes(blogs: &[BlogResponse]) -> Option<AuthorLikeCount> {
    first_max(tally_by_author(blogs, |blog| blog.likes))
        .map(|(author, likes)| AuthorLikeCount { author, likes })
}

/// All aggregates at once
pub fn statistics(blogs: &[BlogResponse]) -> BlogStatistics {
    BlogStatistics {
        total_likes: total_likes(blogs),
        favorite: favorite_blog(blogs),
        most_blogs: most_blogs(blogs),
        most_likes: most_likes(blogs),
    }
}
