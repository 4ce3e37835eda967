pub mod health_controller;
pub mod transfer_controller;
