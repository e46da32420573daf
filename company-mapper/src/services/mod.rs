//! Services layer: lookup, claim building and the issuance hook.

mod claim_builder;
pub mod error;
mod mapper;
mod repository;

pub use claim_builder::{ClaimBuilder, ClaimPayload};
pub use error::MapperError;
pub use mapper::{CompanyMapper, PROVIDER_ID};
pub use repository::{CompanyRepository, MockCompanyRepository, SqlCompanyRepository};
