//! Maker model actions.

use finquina_types::{MakerModel, NewMakerModel};

use crate::error::ActionError;
use crate::farm::{Farm, read_or_default, validate, written};
use crate::revalidate::MAKER;

impl Farm {
    /// All maker models, newest first.
    pub async fn list_maker_models(&self) -> Vec<MakerModel> {
        read_or_default("list_maker_models", self.db.maker_models().list().await)
    }

    /// Register a printable part.
    pub async fn add_maker_model(
        &self,
        new: &NewMakerModel,
    ) -> Result<Option<MakerModel>, ActionError> {
        validate(new)?;
        let model = written("add_maker_model", self.db.maker_models().insert(new).await);
        if model.is_some() {
            self.revalidate(&[MAKER]);
        }
        Ok(model)
    }
}
