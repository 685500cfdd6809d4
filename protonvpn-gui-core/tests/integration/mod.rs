//! Integration test modules

mod backend_tests;
mod controller_tests;
mod support;
mod view_model_tests;
