pub mod normal;
pub mod black_scholes;
pub mod sensitivity;
