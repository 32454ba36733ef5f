//! Listing and post page rendering
//!
//! The view renders whatever the query layer hands it. It never re-sorts
//! or re-filters posts, so fixtures can drive it directly in tests.

pub mod pagination;

use crate::config::SiteConfig;
use crate::content::{Author, Post};
use crate::helpers::{format_date, url_for};
use crate::query::QueryResult;
use crate::templates::{TemplateRenderer, STYLESHEET_PATH};
use anyhow::Result;
use pagination::Pagination;
use serde::Serialize;

/// Identifies which listing page is being rendered
#[derive(Debug, Clone)]
pub struct PageContext {
    /// 1-based ordinal of the listing page
    pub page: usize,
    /// Tag the listing is filtered by, when rendering a tag page
    pub active_tag: Option<String>,
}

impl PageContext {
    pub fn page(page: usize) -> Self {
        Self {
            page,
            active_tag: None,
        }
    }

    pub fn tagged(tag: &str, page: usize) -> Self {
        Self {
            page,
            active_tag: Some(tag.to_string()),
        }
    }
}

/// Site-wide fields every template sees
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub home_path: String,
    pub css_path: String,
    pub atom_path: String,
}

impl SiteData {
    fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            home_path: url_for(&config.root, ""),
            css_path: url_for(&config.root, STYLESHEET_PATH),
            atom_path: url_for(&config.root, "atom.xml"),
        }
    }
}

/// Author fields as the card footer shows them
#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    /// Display name; the registry id doubles as the name
    pub name: String,
    pub github_url: Option<String>,
    pub avatar: Option<String>,
}

impl From<&Author> for AuthorData {
    fn from(author: &Author) -> Self {
        Self {
            name: author.id.clone(),
            github_url: author.github_url(),
            avatar: author.avatar.clone(),
        }
    }
}

/// One post card on the listing
#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub time_to_read: usize,
    /// Publication date, already formatted for display
    pub created: String,
    pub cover: Option<String>,
    pub author: AuthorData,
}

/// One entry in the tag sidebar
#[derive(Debug, Clone, Serialize)]
pub struct TagItemData {
    pub name: String,
    pub count: usize,
    pub href: String,
    pub active: bool,
}

#[derive(Serialize)]
struct ListingContext<'a> {
    site: &'a SiteData,
    page_title: String,
    cards: Vec<CardData>,
    pagination: Pagination,
    tags: Vec<TagItemData>,
}

#[derive(Serialize)]
struct PostContext<'a> {
    site: &'a SiteData,
    page_title: String,
    post: &'a Post,
    author: AuthorData,
    created: String,
    updated: Option<String>,
}

/// Renders listing pages and post pages against the embedded theme
pub struct ListingView {
    templates: TemplateRenderer,
    config: SiteConfig,
    site: SiteData,
}

impl ListingView {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            templates: TemplateRenderer::new()?,
            site: SiteData::from_config(config),
            config: config.clone(),
        })
    }

    /// Path the listing is mounted at for the given context
    pub fn base_path(&self, ctx: &PageContext) -> String {
        match &ctx.active_tag {
            None => url_for(&self.config.root, &format!("{}/", self.config.blog_dir)),
            Some(tag) => self.tag_path(tag),
        }
    }

    fn tag_path(&self, tag: &str) -> String {
        url_for(
            &self.config.root,
            &format!(
                "{}/{}/{}/",
                self.config.blog_dir,
                self.config.tag_dir,
                slug::slugify(tag)
            ),
        )
    }

    /// Render one listing page from a query result
    ///
    /// Cards appear in result order. The pager derives from the result's
    /// total count, not from how many items landed on this page, and is
    /// omitted entirely when everything fits on one page.
    pub fn render(&self, result: &QueryResult, ctx: &PageContext) -> Result<String> {
        let cards = result
            .posts
            .items
            .iter()
            .map(|post| self.card(post))
            .collect();

        let pagination = Pagination::build(
            result.posts.total_count,
            self.config.per_page,
            ctx.page,
            &self.base_path(ctx),
            &self.config.pagination_dir,
        );

        let tags = if self.config.tag_sidebar {
            result
                .tags
                .iter()
                .map(|group| TagItemData {
                    name: group.name.clone(),
                    count: group.count,
                    href: self.tag_path(&group.name),
                    active: ctx.active_tag.as_deref() == Some(group.name.as_str()),
                })
                .collect()
        } else {
            Vec::new()
        };

        let page_title = match &ctx.active_tag {
            Some(tag) => format!("{} - {}", tag, self.config.title),
            None if ctx.page > 1 => format!("{} - page {}", self.config.title, ctx.page),
            None => self.config.title.clone(),
        };

        self.templates.render(
            "listing.html",
            &ListingContext {
                site: &self.site,
                page_title,
                cards,
                pagination,
                tags,
            },
        )
    }

    /// Render a full post page
    pub fn render_post(&self, post: &Post) -> Result<String> {
        self.templates.render(
            "post.html",
            &PostContext {
                site: &self.site,
                page_title: format!("{} - {}", post.title, self.config.title),
                post,
                author: AuthorData::from(&post.author),
                created: format_date(&post.created, &self.config.date_format),
                updated: post
                    .updated
                    .as_ref()
                    .map(|date| format_date(date, &self.config.date_format)),
            },
        )
    }

    fn card(&self, post: &Post) -> CardData {
        CardData {
            href: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            time_to_read: post.time_to_read,
            created: format_date(&post.created, &self.config.date_format),
            cover: post.cover.clone(),
            author: AuthorData::from(&post.author),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Connection, TagGroup};
    use chrono::{Local, TimeZone};
    use std::path::PathBuf;

    fn make_post(title: &str, day: u32, tags: &[&str]) -> Post {
        Post {
            title: title.to_string(),
            slug: format!("/blog/{}/", slug::slugify(title)),
            created: Local.with_ymd_and_hms(2020, 1, day, 0, 0, 0).unwrap(),
            updated: None,
            excerpt: format!("{} excerpt", title),
            time_to_read: 1,
            cover: None,
            author: Author {
                id: "jane".to_string(),
                github: Some("janedoe".to_string()),
                avatar: None,
            },
            tags: tags.iter().map(|t| t.to_string()).collect(),
            draft: false,
            content: format!("<p>{} body</p>\n", title),
            raw: String::new(),
            source: PathBuf::new(),
        }
    }

    fn result_of(posts: Vec<Post>, total: usize, tags: Vec<TagGroup>) -> QueryResult {
        QueryResult {
            tags,
            posts: Connection {
                total_count: total,
                items: posts,
            },
        }
    }

    #[test]
    fn test_card_renders_post_fields() {
        let view = ListingView::new(&SiteConfig::default()).unwrap();
        let result = result_of(vec![make_post("Hello", 1, &[])], 1, vec![]);
        let html = view.render(&result, &PageContext::page(1)).unwrap();

        assert!(html.contains(
            "<h2 class=\"post-card__title\"><a href=\"/blog/hello/\">Hello</a></h2>"
        ));
        assert!(html.contains("01 January, 2020"));
        assert!(html.contains("href=\"https://github.com/janedoe\""));
        assert!(html.contains(">jane</a>"));
        assert!(html.contains("1 min read"));
        assert!(html.contains("post-card__cover--empty"));
    }

    #[test]
    fn test_cards_keep_result_order() {
        let view = ListingView::new(&SiteConfig::default()).unwrap();
        let result = result_of(
            vec![
                make_post("Bravo", 2, &[]),
                make_post("Alpha", 1, &[]),
                make_post("Charlie", 3, &[]),
            ],
            3,
            vec![],
        );
        let html = view.render(&result, &PageContext::page(1)).unwrap();

        let bravo = html.find("Bravo").unwrap();
        let alpha = html.find("Alpha").unwrap();
        let charlie = html.find("Charlie").unwrap();
        assert!(bravo < alpha && alpha < charlie);
    }

    #[test]
    fn test_single_page_has_no_pager() {
        let view = ListingView::new(&SiteConfig::default()).unwrap();
        let result = result_of(vec![make_post("Only", 1, &[])], 1, vec![]);
        let html = view.render(&result, &PageContext::page(1)).unwrap();
        assert!(!html.contains("pager"));
    }

    #[test]
    fn test_empty_listing_renders() {
        let view = ListingView::new(&SiteConfig::default()).unwrap();
        let result = result_of(vec![], 0, vec![]);
        let html = view.render(&result, &PageContext::page(1)).unwrap();

        assert!(html.contains("listing__posts"));
        assert!(!html.contains("post-card"));
        assert!(!html.contains("pager"));
    }

    #[test]
    fn test_pager_links_across_pages() {
        let view = ListingView::new(&SiteConfig::default()).unwrap();
        let posts: Vec<Post> = (11..=20)
            .map(|day| make_post(&format!("Post {}", day), day, &[]))
            .collect();
        let result = result_of(posts, 23, vec![]);
        let html = view.render(&result, &PageContext::page(2)).unwrap();

        assert!(html.contains("class=\"pager\""));
        assert!(html.contains("pager__link--current\">2</span>"));
        assert!(html.contains("href=\"/blog/\""));
        assert!(html.contains("href=\"/blog/page/3/\""));
        assert!(html.contains(">Newer</a>"));
        assert!(html.contains(">Older</a>"));
    }

    #[test]
    fn test_cover_image_used_when_present() {
        let view = ListingView::new(&SiteConfig::default()).unwrap();
        let mut post = make_post("Covered", 1, &[]);
        post.cover = Some("/blog/cover.png".to_string());
        let html = view
            .render(&result_of(vec![post], 1, vec![]), &PageContext::page(1))
            .unwrap();

        assert!(html.contains("src=\"/blog/cover.png\""));
        assert!(!html.contains("post-card__cover--empty"));
    }

    #[test]
    fn test_sidebar_hidden_by_default() {
        let view = ListingView::new(&SiteConfig::default()).unwrap();
        let tags = vec![TagGroup {
            name: "rust".to_string(),
            count: 2,
        }];
        let html = view
            .render(
                &result_of(vec![make_post("A", 1, &["rust"])], 1, tags),
                &PageContext::page(1),
            )
            .unwrap();
        assert!(!html.contains("tag-sidebar"));
    }

    #[test]
    fn test_sidebar_renders_when_enabled() {
        let config = SiteConfig {
            tag_sidebar: true,
            ..SiteConfig::default()
        };
        let view = ListingView::new(&config).unwrap();
        let tags = vec![
            TagGroup {
                name: "rust".to_string(),
                count: 2,
            },
            TagGroup {
                name: "web".to_string(),
                count: 1,
            },
        ];
        let html = view
            .render(
                &result_of(vec![make_post("A", 1, &["rust"])], 1, tags),
                &PageContext::tagged("rust", 1),
            )
            .unwrap();

        assert!(html.contains("tag-sidebar"));
        assert!(html.contains("href=\"/blog/tags/rust/\""));
        assert!(html.contains("tag-sidebar__item--active"));
        assert!(html.contains("tag-sidebar__count\">2</span>"));
    }

    #[test]
    fn test_tag_page_pager_uses_tag_base() {
        let config = SiteConfig {
            tag_sidebar: true,
            ..SiteConfig::default()
        };
        let view = ListingView::new(&config).unwrap();
        let posts: Vec<Post> = (1..=10)
            .map(|day| make_post(&format!("Post {}", day), day, &["rust"]))
            .collect();
        let html = view
            .render(
                &result_of(posts, 12, vec![]),
                &PageContext::tagged("rust", 1),
            )
            .unwrap();

        assert!(html.contains("href=\"/blog/tags/rust/page/2/\""));
    }

    #[test]
    fn test_render_post_page() {
        let view = ListingView::new(&SiteConfig::default()).unwrap();
        let post = make_post("Hello", 1, &["rust"]);
        let html = view.render_post(&post).unwrap();

        assert!(html.contains("<h1 class=\"post__title\">Hello</h1>"));
        assert!(html.contains("<p>Hello body</p>"));
        assert!(html.contains("01 January, 2020"));
        assert!(html.contains("post__tag\">rust</li>"));
        assert!(html.contains("name=\"description\""));
    }
}
