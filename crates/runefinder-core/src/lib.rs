//! RuneFinder Core - find Unicode characters by the words in their names.
//!
//! The library reads the Unicode Character Database (`UnicodeData.txt`),
//! downloading it to a local cache on first use, and answers queries such as
//! `"capital latin"` with every character whose name or alias contains all of
//! the query words.
//!
//! # Example
//!
//! ```rust,ignore
//! use runefinder_core::{ResolverConfig, RuneFinder};
//!
//! #[tokio::main]
//! async fn main() -> runefinder_core::Result<()> {
//!     let finder = RuneFinder::new(ResolverConfig::from_env()?)?;
//!
//!     let results = finder.search("question mark").await?;
//!     for entry in results.sorted() {
//!         println!("U+{:04X}\t{}\t{}", entry.codepoint, entry.glyph, entry.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod network;
pub mod platform;
pub mod record;
pub mod resolver;
pub mod search;

// Re-export commonly used types
pub use config::ResolverConfig;
pub use error::{ErrorCategory, ParseError, Result, RuneError};
pub use record::{format_codepoint, parse_line, Rune};
pub use resolver::{SourceResolver, UcdReader};
pub use search::{query_terms, search_lines, search_reader, ResultSet, RuneEntry};

use std::path::Path;

/// Main entry point: resolve the database, then search it.
///
/// Every call opens the database afresh and builds its own [`ResultSet`];
/// nothing is shared between concurrent queries.
#[derive(Debug, Clone)]
pub struct RuneFinder {
    resolver: SourceResolver,
}

impl RuneFinder {
    /// Create a finder from an explicit configuration.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        Ok(Self {
            resolver: SourceResolver::new(config)?,
        })
    }

    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    /// Search the configured database.
    pub async fn search(&self, query: &str) -> Result<ResultSet> {
        self.search_at(None, query).await
    }

    /// Search the database at `override_path`, or the configured one.
    pub async fn search_at(&self, override_path: Option<&Path>, query: &str) -> Result<ResultSet> {
        let reader = self.resolver.resolve(override_path).await?;
        let query = query.to_string();

        // The scan is plain blocking file I/O
        tokio::task::spawn_blocking(move || search_reader(reader, &query))
            .await
            .map_err(|e| RuneError::Other(format!("Search task failed: {}", e)))?
    }
}
