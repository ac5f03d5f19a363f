pub mod admin;
pub mod auth;
pub mod config;
pub mod controller;
pub mod form;
pub mod gateway;
pub mod leaderboard;
pub mod memory_gateway;
pub mod model;
pub mod profile;
pub mod rest;
pub mod rounds;
pub mod schema;
pub mod session;
pub mod state;
pub mod worker;
