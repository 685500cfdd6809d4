//! Property test modules

mod task_kind_tests;
