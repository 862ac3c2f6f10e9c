//! Helper functions
//!
//! Small pure helpers shared by the renderer, the media pipeline and the
//! CLI: HTML fragments, slugs and media URL resolution.

mod html;
mod slug;
mod url;

pub use self::html::*;
pub use self::slug::*;
pub use self::url::*;
