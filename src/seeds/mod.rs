pub mod demo_data;

pub use demo_data::seed_all;
