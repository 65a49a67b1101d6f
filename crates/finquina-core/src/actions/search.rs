//! Search across crops, trees, resources and tasks.

use finquina_types::{Crop, Resource, Task, Tree};
use serde::Serialize;

use crate::farm::{Farm, read_or_default};

/// Shortest query that triggers a search, in characters.
pub const MIN_QUERY_CHARS: usize = 2;
/// Results per collection.
const RESULTS_PER_KIND: i64 = 10;

/// Matches grouped by collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    /// Crops matching name, variety, bed or notes.
    pub crops: Vec<Crop>,
    /// Trees matching name or notes.
    pub trees: Vec<Tree>,
    /// Resources matching name or category.
    pub resources: Vec<Resource>,
    /// Tasks matching title or description.
    pub tasks: Vec<Task>,
}

impl SearchResults {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        [
            self.crops.len(),
            self.trees.len(),
            self.resources.len(),
            self.tasks.len(),
        ]
        .iter()
        .all(|n| *n == 0)
    }
}

impl Farm {
    /// Case-insensitive substring search, up to ten hits per collection.
    pub async fn global_search(&self, query: &str) -> SearchResults {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return SearchResults::default();
        }

        let crops = self.db.crops();
        let trees = self.db.trees();
        let resources = self.db.resources();
        let tasks = self.db.tasks();
        let (crops, trees, resources, tasks) = tokio::join!(
            crops.search(query, RESULTS_PER_KIND),
            trees.search(query, RESULTS_PER_KIND),
            resources.search(query, RESULTS_PER_KIND),
            tasks.search(query, RESULTS_PER_KIND),
        );

        SearchResults {
            crops: read_or_default("search_crops", crops),
            trees: read_or_default("search_trees", trees),
            resources: read_or_default("search_resources", resources),
            tasks: read_or_default("search_tasks", tasks),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::offline_farm;

    #[tokio::test]
    async fn short_queries_are_empty() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        assert!(farm.global_search("").await.is_empty());
        assert!(farm.global_search(" t ").await.is_empty());
        assert!(farm.global_search("ñ").await.is_empty());
        assert!(farm.global_search("tomate").await.is_empty());
    }
}
