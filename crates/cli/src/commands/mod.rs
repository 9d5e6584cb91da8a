pub mod configure;
pub mod market;
