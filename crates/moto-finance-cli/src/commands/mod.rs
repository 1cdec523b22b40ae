pub mod financing;
pub mod lead;
