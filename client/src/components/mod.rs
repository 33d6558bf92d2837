pub mod header;
pub mod private_route;
pub mod spinner;
