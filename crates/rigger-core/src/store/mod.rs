pub mod install_store;

pub use install_store::InstallStore;
