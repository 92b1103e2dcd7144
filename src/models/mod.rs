pub mod user;
pub mod miniature;
pub mod miniature_faction;
pub mod miniature_keyword;
pub mod miniature_characteristic;
pub mod miniature_box_name;
pub mod collection_entry;
pub mod photo;
pub mod photo_miniature;
pub mod comment;
pub mod like;

pub use collection_entry::{CollectionEntry, MiniatureSummary};
pub use comment::Comment;
pub use miniature::{Miniature, MiniatureSuggestion};
pub use photo::{LinkedMiniature, Photo};
