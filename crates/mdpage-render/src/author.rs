//! Author attribution strategies.

use crate::markup::link;

pub const GITHUB_BASE_URL: &str = "https://github.com/";

/// Turns the raw `author` field into the text printed after a description.
pub trait AuthorRenderer {
    fn render(&self, author: &str) -> String;
}

/// Prints the author field unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainAuthor;

impl AuthorRenderer for PlainAuthor {
    fn render(&self, author: &str) -> String {
        author.to_owned()
    }
}

/// Shortens GitHub profile URLs into mention links, e.g. `[@alice](https://github.com/alice)`.
#[derive(Clone, Debug)]
pub struct GitHubAuthor {
    pub prefix: String,
}

impl GitHubAuthor {
    pub fn new(prefix: impl Into<String>) -> Self {
        GitHubAuthor {
            prefix: prefix.into(),
        }
    }
}

impl Default for GitHubAuthor {
    fn default() -> Self {
        GitHubAuthor::new("@")
    }
}

impl AuthorRenderer for GitHubAuthor {
    fn render(&self, author: &str) -> String {
        let Some(rest) = author.strip_prefix(GITHUB_BASE_URL) else {
            return author.to_owned();
        };
        if rest.is_empty() {
            return author.to_owned();
        }

        let handle = rest.trim();
        // repository or deeper path, not a profile
        if handle.contains('/') {
            return author.to_owned();
        }

        link(&format!("{}{}", self.prefix, handle), author)
    }
}
