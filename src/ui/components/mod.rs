pub mod history_table;
pub mod menu;
pub mod results;
pub mod typing_area;
