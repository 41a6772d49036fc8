mod cart;
mod common;
mod routing;
