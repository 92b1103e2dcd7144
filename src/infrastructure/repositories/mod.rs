//! Repository implementations using SeaORM

pub mod catalog_repository;
pub mod collection_repository;
pub mod photo_repository;
pub mod social_repository;

pub use catalog_repository::SeaOrmCatalogRepository;
pub use collection_repository::SeaOrmCollectionRepository;
pub use photo_repository::SeaOrmPhotoRepository;
pub use social_repository::SeaOrmSocialRepository;
