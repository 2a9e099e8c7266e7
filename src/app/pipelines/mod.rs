pub mod geocode_pipeline;
