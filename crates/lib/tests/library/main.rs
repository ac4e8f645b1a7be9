mod common;
mod project_tests;
