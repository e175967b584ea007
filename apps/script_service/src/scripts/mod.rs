pub mod cloud_script_store;
pub mod local_script_store;
pub mod script_record;
pub mod script_store;
pub mod scripts_controller;
