//! Watch-history source backed by Letterboxd profile pages
//!
//! Letterboxd has no public API, so the rated-films grid is scraped page by page:
//! `/{username}/films/rated/.5-5/page/{n}/` lists every film rated half a star or more.
use crate::{
    error::{AppError, AppResult},
    models::HistoryEntry,
};
use reqwest::{Client as HttpClient, StatusCode};
use scraper::{ElementRef, Html, Selector};

const MAX_PAGES: u32 = 100;
const USER_AGENT: &str = concat!("cinematch-api/", env!("CARGO_PKG_VERSION"));

/// Trait for watch-history sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HistorySource: Send + Sync {
    /// Every film the user has rated, in the order the site lists them
    async fn fetch_rated_films(&self, username: &str) -> AppResult<Vec<HistoryEntry>>;
}

#[derive(Clone)]
pub struct LetterboxdScraper {
    http_client: HttpClient,
    base_url: String,
    max_pages: u32,
}

impl LetterboxdScraper {
    pub fn new(base_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_pages: MAX_PAGES,
        })
    }

    /// Caps how many history pages are fetched per user
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn page_url(&self, username: &str, page: u32) -> String {
        format!("{}/{}/films/rated/.5-5/page/{}/", self.base_url, username, page)
    }

    async fn fetch_page(&self, username: &str, page: u32) -> AppResult<String> {
        let url = self.page_url(username, page);
        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Letterboxd user {}", username)));
        }

        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "Letterboxd returned status {} for {}",
                status, url
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl HistorySource for LetterboxdScraper {
    async fn fetch_rated_films(&self, username: &str) -> AppResult<Vec<HistoryEntry>> {
        validate_username(username)?;

        let mut films = Vec::new();
        let mut reached_end = false;
        for page in 1..=self.max_pages {
            let html = self.fetch_page(username, page).await?;
            let entries = parse_rated_films(&html)?;
            if entries.is_empty() {
                reached_end = true;
                break;
            }

            tracing::debug!(
                username = %username,
                page = page,
                entries = entries.len(),
                "Scraped history page"
            );
            films.extend(entries);
        }

        if !reached_end {
            tracing::warn!(
                username = %username,
                max_pages = self.max_pages,
                films = films.len(),
                "Page limit reached, history truncated"
            );
        }

        tracing::info!(
            username = %username,
            films = films.len(),
            "Fetched rated films"
        );

        Ok(films)
    }
}

/// Letterboxd usernames are ASCII letters, digits and underscores
fn validate_username(username: &str) -> AppResult<()> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Invalid Letterboxd username: {:?}",
            username
        )))
    }
}

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| AppError::Scrape(format!("bad selector {}: {}", css, e)))
}

/// Extracts rated films from one page of the rated-films grid
///
/// Entries without a film id or slug are skipped. Handles both the classic
/// `film-poster` markup and the newer lazy-loaded poster component.
pub fn parse_rated_films(html: &str) -> AppResult<Vec<HistoryEntry>> {
    let document = Html::parse_document(html);
    let item_selector = selector("li.poster-container, li.griditem")?;
    let poster_selector = selector("div.film-poster, div.react-component, div[data-film-id]")?;
    let image_selector = selector("img")?;
    let rating_selector = selector("span.rating")?;

    let mut entries = Vec::new();
    for item in document.select(&item_selector) {
        let Some(poster) = item.select(&poster_selector).next() else {
            continue;
        };

        let attr = |name: &str| poster.value().attr(name).map(str::trim).filter(|v| !v.is_empty());

        let (Some(film_id), Some(slug)) = (
            attr("data-film-id"),
            attr("data-film-slug").or_else(|| attr("data-item-slug")),
        ) else {
            continue;
        };

        let title = attr("data-film-name")
            .map(str::to_string)
            .or_else(|| image_alt(&poster, &image_selector))
            .or_else(|| attr("data-item-name").map(|name| strip_release_year(name).to_string()))
            .unwrap_or_else(|| slug.to_string());

        let rating = item
            .select(&rating_selector)
            .next()
            .map(|span| span.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        entries.push(HistoryEntry {
            title,
            film_id: film_id.to_string(),
            slug: slug.to_string(),
            rating,
        });
    }

    Ok(entries)
}

/// Drops a trailing ` (YYYY)` so the title matches TMDb and history titles
fn strip_release_year(name: &str) -> &str {
    let Some(base) = name
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once(" ("))
        .filter(|(_, year)| year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()))
        .map(|(base, _)| base.trim_end())
    else {
        return name;
    };

    if base.is_empty() {
        name
    } else {
        base
    }
}

fn image_alt(poster: &ElementRef<'_>, image_selector: &Selector) -> Option<String> {
    poster
        .select(image_selector)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .map(str::to_string)
}
