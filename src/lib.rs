pub mod config;
pub mod error;
pub mod indicator;
pub mod input;
pub mod market_data;
pub mod model;
pub mod params;
pub mod pipeline;
pub mod resample;
pub mod strategy;
pub mod ui;
pub mod view;
