pub mod locationiq;
