pub mod check;
pub mod stop;
