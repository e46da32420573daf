//! company-mapper: embeds a user's company affiliations into issued tokens.
//!
//! On each issuance the mapper resolves the per-mapper data source settings,
//! runs one parameterized lookup keyed by the login username and inserts the
//! result as a JSON array claim through the host's claim-mapping primitive.

pub mod claims;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use config::{ClaimSettings, DataSourceConfig};
pub use models::{Affiliation, IdToken, MapperDescriptor, MapperModel, TokenKind};
pub use services::{
    ClaimBuilder, ClaimPayload, CompanyMapper, CompanyRepository, MapperError,
    MockCompanyRepository, SqlCompanyRepository,
};
