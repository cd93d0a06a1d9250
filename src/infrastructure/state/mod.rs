pub mod json_state_repo;
