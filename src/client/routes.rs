//! Client-side routes

use std::fmt;

/// Views the client can navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The articles listing
    Articles,
    /// The edit view of one article
    ArticleEdit { id: String },
}

impl Route {
    /// URL path of the view
    pub fn path(&self) -> String {
        match self {
            Self::Articles => "/articles".to_string(),
            Self::ArticleEdit { id } => format!("/article/{id}/edit"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Articles.path(), "/articles");
        assert_eq!(
            Route::ArticleEdit { id: "3".to_string() }.to_string(),
            "/article/3/edit"
        );
    }
}
