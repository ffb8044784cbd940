pub mod demo;
pub mod io;
pub mod systems;
