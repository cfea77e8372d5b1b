pub(crate) mod driver;
pub(crate) mod manifest;
pub(crate) mod store;
