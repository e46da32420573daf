pub mod affiliation;
pub mod descriptor;
pub mod mapper_model;
pub mod token;

pub use affiliation::{Affiliation, AffiliationRow};
pub use descriptor::{ConfigProperty, MapperDescriptor, PropertyType};
pub use mapper_model::MapperModel;
pub use token::{IdToken, TokenKind};
