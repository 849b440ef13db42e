//! Configuration module

mod site;

pub use site::CmsConfig;
pub use site::CommentsConfig;
pub use site::IssueTerm;
pub use site::SiteConfig;
pub use site::{ACCESS_TOKEN_ENV, ENDPOINT_ENV};
