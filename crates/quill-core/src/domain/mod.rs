//! Domain entities - the core business objects.

mod post;
mod social;
mod status;

pub use post::{ContentPost, TEST_DATA_TAG};
pub use social::{SocialPlatform, SocialPost};
pub use status::{PostStatus, derive_status};
