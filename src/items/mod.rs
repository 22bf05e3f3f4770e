pub mod controller;
pub mod model;
pub mod store;

pub use controller::{ItemPage, ItemsController, ItemsPage};
pub use model::{Item, ItemForm, PageParams, Pagination, ValidationErrors};
pub use store::{ItemStore, PgItemStore, StoreError};
