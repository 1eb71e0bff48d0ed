pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown species: {name}")]
    UnknownSpecies { name: String },

    #[error("Catalog listing JSON error: {0}")]
    CatalogJson(#[from] serde_json::Error),
}
