pub mod common;

mod capture;
mod switching;
