mod auth_tests;
mod division_tests;
mod grade_tests;
