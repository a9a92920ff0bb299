//! Records the page receives, as the registry and the comment service deliver them.

pub mod application;
pub mod comment_period;
pub mod feature;

pub use application::Application;
pub use comment_period::CommentPeriod;
pub use feature::{Feature, TenureProperties};
