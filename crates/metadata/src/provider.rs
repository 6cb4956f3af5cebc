use crate::mdblist::MdblistClient;
use crate::tmdb::TmdbClient;
use crate::{FindResults, MetadataError, ResolvedMetadata, SecondaryInfo};

/// The catalog operations the orchestrator needs. Object-safe so tests can
/// script responses without touching the network.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search the primary catalog by external id; classification hint.
    async fn find_by_imdb(&self, imdb_id: &str) -> Result<FindResults, MetadataError>;

    /// Info record from the secondary catalog; classification hint plus
    /// the optional internal id.
    async fn info_by_imdb(&self, imdb_id: &str) -> Result<SecondaryInfo, MetadataError>;

    /// Detailed movie lookup by internal id.
    async fn movie_details(&self, tmdb_id: u64) -> Result<ResolvedMetadata, MetadataError>;

    /// Detailed series lookup by internal id.
    async fn tv_details(&self, tmdb_id: u64) -> Result<ResolvedMetadata, MetadataError>;
}

/// Production catalog: TMDB as the primary, MDBList as the secondary.
pub struct Catalog {
    tmdb: TmdbClient,
    mdblist: MdblistClient,
}

impl Catalog {
    pub fn new(tmdb: TmdbClient, mdblist: MdblistClient) -> Self {
        Self { tmdb, mdblist }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for Catalog {
    async fn find_by_imdb(&self, imdb_id: &str) -> Result<FindResults, MetadataError> {
        self.tmdb.find_by_imdb(imdb_id).await
    }

    async fn info_by_imdb(&self, imdb_id: &str) -> Result<SecondaryInfo, MetadataError> {
        self.mdblist.info_by_imdb(imdb_id).await
    }

    async fn movie_details(&self, tmdb_id: u64) -> Result<ResolvedMetadata, MetadataError> {
        self.tmdb.movie_details(tmdb_id).await
    }

    async fn tv_details(&self, tmdb_id: u64) -> Result<ResolvedMetadata, MetadataError> {
        self.tmdb.tv_details(tmdb_id).await
    }
}
