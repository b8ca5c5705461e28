pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService, HomeView};

pub mod catalog_service_impl;
pub use catalog_service_impl::DocumentCatalogService;

pub mod image;
pub use image::ImageService;

pub mod metadata;
pub use metadata::{
    DisabledMetadataProvider, JikanMetadataProvider, MetadataMatch, MetadataProvider,
};
