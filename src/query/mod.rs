//! Content index and listing queries
//!
//! The index holds every published post, newest first. Queries slice out
//! one page of posts at a time; the view layer renders whatever a query
//! returns without re-sorting or re-filtering.

use crate::content::Post;
use std::collections::BTreeMap;

/// A tag with the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub name: String,
    pub count: usize,
}

/// A page-sized window over the matching posts
#[derive(Debug, Clone)]
pub struct Connection {
    /// Number of posts matching the query before paging
    pub total_count: usize,
    pub items: Vec<Post>,
}

/// Everything the listing view needs for one page
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub tags: Vec<TagGroup>,
    pub posts: Connection,
}

/// Parameters selecting one listing page
#[derive(Debug, Clone)]
pub struct ListingQuery {
    /// 1-based page ordinal
    pub page: usize,
    pub per_page: usize,
    /// Restrict the listing to posts carrying this tag
    pub tag: Option<String>,
}

impl ListingQuery {
    pub fn page(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page,
            tag: None,
        }
    }

    pub fn tagged(tag: &str, page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page,
            tag: Some(tag.to_string()),
        }
    }
}

/// Sorted, queryable collection of posts
pub struct ContentIndex {
    posts: Vec<Post>,
}

impl ContentIndex {
    /// Build an index over the given posts, newest first
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.created.cmp(&a.created));
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Run a listing query, slicing out one page of posts
    ///
    /// A page past the end yields an empty item list; `total_count` still
    /// reports the full match count.
    pub fn run(&self, query: &ListingQuery) -> QueryResult {
        let matching: Vec<&Post> = self
            .posts
            .iter()
            .filter(|post| match &query.tag {
                Some(tag) => post.tags.iter().any(|t| t == tag),
                None => true,
            })
            .collect();

        let total_count = matching.len();
        let start = (query.page.max(1) - 1).saturating_mul(query.per_page);

        let items = if query.per_page == 0 || start >= total_count {
            Vec::new()
        } else {
            let end = (start + query.per_page).min(total_count);
            matching[start..end].iter().map(|post| (*post).clone()).collect()
        };

        QueryResult {
            tags: self.tag_groups(),
            posts: Connection { total_count, items },
        }
    }

    /// Distinct tags with counts, sorted by name
    pub fn tag_groups(&self) -> Vec<TagGroup> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for post in &self.posts {
            for tag in &post.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .map(|(name, count)| TagGroup {
                name: name.to_string(),
                count,
            })
            .collect()
    }
}
