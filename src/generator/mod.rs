pub mod practice;
pub mod presets;
