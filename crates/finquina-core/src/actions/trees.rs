//! Fruit tree actions.

use finquina_types::{NewTree, Tree, TreeId};

use crate::error::ActionError;
use crate::farm::{Farm, read_or_default, validate, written};
use crate::revalidate::{CROPS, HOME, MAP};

impl Farm {
    /// All trees.
    pub async fn list_trees(&self) -> Vec<Tree> {
        read_or_default("list_trees", self.db.trees().list().await)
    }

    /// Register a tree.
    pub async fn add_tree(&self, new: &NewTree) -> Result<Option<Tree>, ActionError> {
        validate(new)?;
        let tree = written("add_tree", self.db.trees().insert(new).await);
        if tree.is_some() {
            self.revalidate(&[CROPS, MAP, HOME]);
        }
        Ok(tree)
    }

    /// Remove a tree.
    pub async fn delete_tree(&self, id: TreeId) -> bool {
        let deleted = written("delete_tree", self.db.trees().delete(id).await).unwrap_or(false);
        if deleted {
            self.revalidate(&[CROPS, MAP, HOME]);
        }
        deleted
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::offline_farm;

    use super::*;

    #[tokio::test]
    async fn coordinates_are_validated_before_storage() {
        let Some((farm, _dir)) = offline_farm().await else {
            return;
        };
        let tree = NewTree {
            name: "Manzano".to_owned(),
            longitude: Some(200.0),
            ..NewTree::default()
        };
        assert!(matches!(farm.add_tree(&tree).await, Err(ActionError::Invalid(_))));
        assert!(farm.list_trees().await.is_empty());
        assert!(!farm.delete_tree(TreeId(4)).await);
    }
}
