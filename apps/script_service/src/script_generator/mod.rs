pub mod form;
pub mod prompt;
pub mod script_generator_controller;
pub mod script_generator_service;
