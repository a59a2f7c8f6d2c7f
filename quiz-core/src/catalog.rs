use chrono::{DateTime, Duration, TimeZone, Utc};
use quiz_types::{CLUE_COUNT, GameError, Movie};
use uuid::Uuid;

/// Ordered collection of movies available to the quiz.
///
/// The catalog is the static data source the state machine selects from;
/// movies are immutable once added. Admin uploads append to it in memory.
pub struct MovieCatalog {
    movies: Vec<Movie>,
}

impl MovieCatalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// Catalog seeded with the built-in launch titles.
    pub fn with_default_movies() -> Self {
        let movies = vec![
            Movie {
                id: Uuid::new_v4(),
                title: "The Matrix".to_string(),
                week: 1,
                images: vec![
                    "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=400".to_string(),
                    "https://images.unsplash.com/photo-1489599735734-79b4f9ab7b34?w=400".to_string(),
                    "https://images.unsplash.com/photo-1440404653325-ab127d49abc1?w=400".to_string(),
                ],
                is_active: true,
                start_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
                end_date: Utc.with_ymd_and_hms(2024, 1, 21, 0, 0, 0).unwrap(),
            },
            Movie {
                id: Uuid::new_v4(),
                title: "Inception".to_string(),
                week: 2,
                images: vec![
                    "https://images.unsplash.com/photo-1489599735734-79b4f9ab7b34?w=400".to_string(),
                    "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=400".to_string(),
                    "https://images.unsplash.com/photo-1440404653325-ab127d49abc1?w=400".to_string(),
                ],
                is_active: false,
                start_date: Utc.with_ymd_and_hms(2024, 1, 22, 0, 0, 0).unwrap(),
                end_date: Utc.with_ymd_and_hms(2024, 1, 28, 0, 0, 0).unwrap(),
            },
        ];

        Self { movies }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn find(&self, movie_id: Uuid) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == movie_id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Movie> {
        let wanted = crate::ScoringEngine::normalize(title);
        self.movies
            .iter()
            .find(|movie| crate::ScoringEngine::normalize(&movie.title) == wanted)
    }

    /// The movie flagged active, falling back to the first entry.
    pub fn active(&self) -> Option<&Movie> {
        self.movies
            .iter()
            .find(|movie| movie.is_active)
            .or_else(|| self.movies.first())
    }

    /// Append a new movie for the next free week slot.
    ///
    /// Rejects blank titles and image sets that are not exactly
    /// [`CLUE_COUNT`] entries long.
    pub fn add_movie(
        &mut self,
        title: &str,
        images: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<&Movie, GameError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GameError::InvalidMovie {
                reason: "title must not be empty".to_string(),
            });
        }
        if images.len() != CLUE_COUNT {
            return Err(GameError::InvalidMovie {
                reason: format!("expected exactly {} images, got {}", CLUE_COUNT, images.len()),
            });
        }

        let week = self.movies.iter().map(|movie| movie.week).max().unwrap_or(0) + 1;
        let movie = Movie {
            id: Uuid::new_v4(),
            title: title.to_string(),
            week,
            images,
            is_active: false,
            start_date: now,
            end_date: now + Duration::days(7),
        };

        tracing::info!("added movie '{}' for week {}", movie.title, movie.week);
        self.movies.push(movie);
        Ok(self.movies.last().expect("movie was just pushed"))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl Default for MovieCatalog {
    fn default() -> Self {
        Self::with_default_movies()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = MovieCatalog::with_default_movies();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.active().unwrap().title, "The Matrix");
        assert!(catalog.find_by_title("inception").is_some());
    }

    #[test]
    fn test_find_by_id() {
        let catalog = MovieCatalog::with_default_movies();
        let id = catalog.movies()[1].id;
        assert_eq!(catalog.find(id).unwrap().title, "Inception");
        assert!(catalog.find(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_add_movie_assigns_next_week() {
        let mut catalog = MovieCatalog::with_default_movies();
        let images = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let movie = catalog.add_movie("Arrival", images, Utc::now()).unwrap();
        assert_eq!(movie.week, 3);
        assert!(!movie.is_active);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_add_movie_validates_input() {
        let mut catalog = MovieCatalog::new(Vec::new());
        let images = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let err = catalog.add_movie("   ", images.clone(), Utc::now()).unwrap_err();
        assert!(matches!(err, GameError::InvalidMovie { .. }));

        let err = catalog
            .add_movie("Arrival", vec!["a".to_string()], Utc::now())
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidMovie { .. }));

        assert!(catalog.is_empty());
    }

    #[test]
    fn test_empty_catalog_has_no_active_movie() {
        let catalog = MovieCatalog::new(Vec::new());
        assert!(catalog.active().is_none());
    }
}
