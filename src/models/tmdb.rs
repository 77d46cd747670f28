use serde::{Deserialize, Serialize};

// ============================================================================
// TMDb API Types
// ============================================================================

/// Paged list response (search results, recommendations)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Movie summary as returned by search and recommendation endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl MovieSummary {
    pub fn has_overview(&self) -> bool {
        self.overview.as_deref().is_some_and(|o| !o.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Full movie details from GET /movie/{id}?append_to_response=credits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

impl MovieDetails {
    /// Overview text, treating an empty string as missing
    pub fn overview_text(&self) -> Option<&str> {
        self.overview.as_deref().filter(|o| !o.is_empty())
    }

    pub fn genre_names(&self) -> Vec<String> {
        self.genres
            .iter()
            .flatten()
            .map(|g| g.name.clone())
            .collect()
    }

    /// First crew member credited with the "Director" job
    pub fn director(&self) -> Option<String> {
        self.credits.as_ref().and_then(|credits| {
            credits
                .crew
                .iter()
                .find(|member| member.job.as_deref() == Some("Director"))
                .map(|member| member.name.clone())
        })
    }

    /// The first `limit` cast members, in billing order
    pub fn top_cast(&self, limit: usize) -> Vec<String> {
        self.credits
            .iter()
            .flat_map(|credits| credits.cast.iter().take(limit))
            .map(|member| member.name.clone())
            .collect()
    }

    /// Candidates need an overview, a genre list and credits to be scored
    pub fn is_scorable(&self) -> bool {
        self.overview_text().is_some() && self.genres.is_some() && self.credits.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS_JSON: &str = r#"{
        "id": 949,
        "title": "Heat",
        "overview": "Obsessive master thief Neil McCauley leads a top-notch crew.",
        "poster_path": "/umSVjVdbVwtx5ryCA2QXL44Durm.jpg",
        "genres": [{"id": 28, "name": "Action"}, {"id": 80, "name": "Crime"}],
        "runtime": 170,
        "credits": {
            "cast": [
                {"name": "Al Pacino", "character": "Vincent Hanna", "order": 0},
                {"name": "Robert De Niro", "character": "Neil McCauley", "order": 1}
            ],
            "crew": [
                {"name": "Art Linson", "job": "Producer", "department": "Production"},
                {"name": "Michael Mann", "job": "Director", "department": "Directing"},
                {"name": "Someone Else", "job": "Director", "department": "Directing"}
            ]
        }
    }"#;

    #[test]
    fn test_details_deserialization() {
        let details: MovieDetails = serde_json::from_str(DETAILS_JSON).unwrap();
        assert_eq!(details.id, 949);
        assert_eq!(details.genre_names(), vec!["Action", "Crime"]);
        assert!(details.is_scorable());
    }

    #[test]
    fn test_director_is_first_director_credit() {
        let details: MovieDetails = serde_json::from_str(DETAILS_JSON).unwrap();
        assert_eq!(details.director().as_deref(), Some("Michael Mann"));
    }

    #[test]
    fn test_top_cast_respects_limit() {
        let details: MovieDetails = serde_json::from_str(DETAILS_JSON).unwrap();
        assert_eq!(details.top_cast(1), vec!["Al Pacino"]);
        assert_eq!(details.top_cast(5).len(), 2);
    }

    #[test]
    fn test_missing_credits_not_scorable() {
        let details: MovieDetails =
            serde_json::from_str(r#"{"id": 1, "title": "X", "overview": "Plot", "genres": []}"#)
                .unwrap();
        assert!(!details.is_scorable());
        assert_eq!(details.director(), None);
        assert!(details.top_cast(5).is_empty());
    }

    #[test]
    fn test_empty_overview_is_missing() {
        let details: MovieDetails = serde_json::from_str(
            r#"{"id": 1, "title": "X", "overview": "", "genres": [], "credits": {}}"#,
        )
        .unwrap();
        assert_eq!(details.overview_text(), None);
        assert!(!details.is_scorable());
    }

    #[test]
    fn test_search_page_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 949, "title": "Heat", "overview": "A heist.", "release_date": "1995-12-15"},
                {"id": 12, "title": "Heat", "overview": null, "poster_path": null}
            ],
            "total_pages": 3,
            "total_results": 41
        }"#;

        let page: Page<MovieSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert!(page.results[0].has_overview());
        assert!(!page.results[1].has_overview());
    }

    #[test]
    fn test_page_without_results_is_empty() {
        let page: Page<MovieSummary> = serde_json::from_str(r#"{"page": 1}"#).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
