pub mod calibration;
pub mod capability;
pub mod controller;
pub mod event;
pub mod identity;
pub mod manager;
pub mod mapper;
pub mod poller;
pub mod scanner;
pub mod source;
pub mod state;

#[cfg(test)]
mod controller_test;
